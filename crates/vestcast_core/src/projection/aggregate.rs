//! Per-year tax bucket aggregation.
//!
//! # Responsibility
//! - Price every vesting event under the global assumptions.
//! - Accumulate shares/income/tax into per-year buckets.
//!
//! # Invariants
//! - Vesting on or before the conversion date is repriced into the
//!   conversion year at the base FMV.
//! - FMV compounds once per whole year after the conversion year.
//! - Buckets exist only for years with at least one contributing event.
//! - Accumulation runs in grant order, then event order, so totals are
//!   reproducible bit-for-bit.

use crate::model::assumptions::Assumptions;
use crate::projection::vesting::vesting_events;
use crate::repo::grant_repo::GrantBook;
use chrono::Datelike;
use std::collections::BTreeMap;

/// Aggregated shares/income/tax for one tax year across all grants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearBucket {
    pub year: i32,
    pub shares: u64,
    pub income: f64,
    pub tax: f64,
}

impl YearBucket {
    fn empty(year: i32) -> Self {
        Self {
            year,
            shares: 0,
            income: 0.0,
            tax: 0.0,
        }
    }

    /// Income-weighted average FMV for the year's vested shares.
    pub fn average_fmv(&self) -> f64 {
        if self.shares == 0 {
            0.0
        } else {
            self.income / self.shares as f64
        }
    }
}

/// Income and tax summed across all buckets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectionTotals {
    pub income: f64,
    pub tax: f64,
}

/// Projects every grant in `book` under `assumptions` into per-year
/// buckets.
///
/// Zero grants yield an empty map. The aggregator has no failure path:
/// assumptions and grants are sanitized by construction.
pub fn project(book: &GrantBook, assumptions: &Assumptions) -> BTreeMap<i32, YearBucket> {
    let conversion_year = assumptions.conversion_date.year();
    let growth = 1.0 + assumptions.growth_rate / 100.0;
    let mut buckets: BTreeMap<i32, YearBucket> = BTreeMap::new();

    for grant in book.grants() {
        for event in vesting_events(grant.shares, grant.years, grant.start) {
            let target_year = if event.date <= assumptions.conversion_date {
                conversion_year
            } else {
                event.year
            };
            let steps = (target_year - conversion_year).max(0);
            let fmv = if steps == 0 {
                assumptions.fmv
            } else {
                assumptions.fmv * growth.powi(steps)
            };
            let income = event.shares as f64 * fmv;
            let tax = income * assumptions.tax_rate / 100.0;

            let bucket = buckets
                .entry(target_year)
                .or_insert_with(|| YearBucket::empty(target_year));
            bucket.shares += event.shares;
            bucket.income += income;
            bucket.tax += tax;
        }
    }

    buckets
}

/// Sums income and tax across all buckets, in year order.
pub fn projection_totals(buckets: &BTreeMap<i32, YearBucket>) -> ProjectionTotals {
    let mut totals = ProjectionTotals::default();
    for bucket in buckets.values() {
        totals.income += bucket.income;
        totals.tax += bucket.tax;
    }
    totals
}
