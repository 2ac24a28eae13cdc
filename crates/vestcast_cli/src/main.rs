//! Terminal driver for the Vestcast projection engine.
//!
//! # Responsibility
//! - Load (or seed) session state and render the projection tables.
//! - Keep all decision logic in `vestcast_core`; this binary is
//!   presentation glue only.

use std::path::{Path, PathBuf};
use vestcast_core::{
    default_log_level, init_logging, projection_totals, GrantSeed, Planner, StateVault, STATE_KEY,
};

fn main() {
    let planner = match std::env::args().nth(1).map(PathBuf::from) {
        Some(dir) => open_persistent(&dir),
        None => seeded_in_memory(),
    };

    render(&planner);
}

fn open_persistent(dir: &Path) -> Planner {
    let dir = match std::fs::create_dir_all(dir).and_then(|_| dir.canonicalize()) {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("data dir `{}` unusable ({err}); running in memory", dir.display());
            return seeded_in_memory();
        }
    };

    if let Some(log_dir) = dir.join("logs").to_str() {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match StateVault::open(&dir, STATE_KEY) {
        Ok(vault) => Planner::open(vault),
        Err(err) => {
            eprintln!("stores unavailable ({err}); running in memory");
            seeded_in_memory()
        }
    }
}

fn seeded_in_memory() -> Planner {
    let mut planner = Planner::new();
    planner.add_grant(GrantSeed::default());
    planner
}

fn render(planner: &Planner) {
    let assumptions = planner.assumptions();
    println!("vestcast {}", vestcast_core::core_version());
    println!();
    println!(
        "Assumptions: FMV {} ({}), conversion {}, tax {}%, growth {}%/yr",
        format_usd(assumptions.fmv),
        if assumptions.fmv_locked { "pinned" } else { "derived" },
        assumptions.conversion_date,
        assumptions.tax_rate,
        assumptions.growth_rate,
    );
    println!(
        "             {} shares outstanding, {} post-money",
        format_int(assumptions.total_shares_outstanding),
        format_usd(assumptions.post_money_valuation),
    );
    println!();

    if planner.grants().is_empty() {
        println!("Add a grant to begin modeling your tax exposure.");
        return;
    }

    println!("Grants:");
    for (position, grant) in planner.grants().iter().enumerate() {
        println!(
            "  [{}] {} — {} shares from {} over {} years",
            grant.id,
            grant.display_title(position),
            format_int(grant.shares),
            grant.start,
            grant.years,
        );
    }
    println!();
    println!(
        "Immediate election: {} shares at grant, {} projected tax",
        format_int(planner.total_granted_shares()),
        format_usd(0.0),
    );
    println!();

    let buckets = planner.projection();
    if buckets.is_empty() {
        println!("No vesting to project for the current grant dates.");
        return;
    }

    println!(
        "{:<12} {:>14} {:>12} {:>18} {:>18}",
        "Year", "Shares", "Avg FMV", "Income", "Tax"
    );
    for bucket in buckets.values() {
        if bucket.shares == 0 {
            continue;
        }
        println!(
            "{:<12} {:>14} {:>12} {:>18} {:>18}",
            format!("Taxes for {}", bucket.year),
            format_int(bucket.shares),
            format_usd(bucket.average_fmv()),
            format_usd(bucket.income),
            format_usd(bucket.tax),
        );
    }

    let totals = projection_totals(buckets);
    println!();
    println!(
        "Totals: income {}, tax {}",
        format_usd(totals.income),
        format_usd(totals.tax)
    );
}

fn format_usd(value: f64) -> String {
    let total_cents = (value * 100.0).round() as i64;
    let sign = if total_cents < 0 { "-" } else { "" };
    let cents = total_cents.unsigned_abs();
    format!(
        "{sign}${}.{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

fn format_int(value: u64) -> String {
    group_thousands(value)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
