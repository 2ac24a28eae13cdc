//! Global projection assumptions and their sanitizers.
//!
//! # Responsibility
//! - Hold the six global parameters that price every vesting event.
//! - Derive FMV from valuation and share count unless explicitly pinned.
//! - Express assumption edits as typed commands.
//!
//! # Invariants
//! - `fmv` is never negative and never non-finite.
//! - `tax_rate` stays in `[0, 100]`, `growth_rate` in `[-100, 500]`.
//! - While `fmv_locked` is false, share/valuation edits re-derive `fmv`;
//!   an explicit FMV edit sets the lock, `reset` clears it.

use crate::dates::parse_iso_date;
use crate::model::grant::sanitize_shares;
use chrono::NaiveDate;

pub const DEFAULT_TOTAL_SHARES: u64 = 10_000_000;
pub const DEFAULT_POST_MONEY: f64 = 100_000_000.0;
pub const DEFAULT_TAX_RATE: f64 = 42.0;
pub const DEFAULT_GROWTH_RATE: f64 = 35.0;

pub const MIN_TAX_RATE: f64 = 0.0;
pub const MAX_TAX_RATE: f64 = 100.0;
pub const MIN_GROWTH_RATE: f64 = -100.0;
pub const MAX_GROWTH_RATE: f64 = 500.0;

/// Fallback conversion date for unparseable date input; also the default
/// conversion event the projection is anchored to.
pub fn default_conversion_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid default conversion date")
}

/// Global parameters applied to every grant during projection.
///
/// One instance per session, owned by the planner service and passed by
/// reference into the pure projection functions.
#[derive(Debug, Clone, PartialEq)]
pub struct Assumptions {
    /// Fully diluted shares outstanding; divisor for FMV derivation.
    pub total_shares_outstanding: u64,
    /// Post-money valuation of the conversion round, in dollars.
    pub post_money_valuation: f64,
    /// Per-share fair market value at the conversion date.
    pub fmv: f64,
    /// Cutoff date; vesting on or before it is repriced into the
    /// conversion year.
    pub conversion_date: NaiveDate,
    /// Flat tax rate in percent.
    pub tax_rate: f64,
    /// Assumed annual FMV growth after the conversion year, in percent.
    pub growth_rate: f64,
    /// True once the user has pinned `fmv` by hand; serialized under the
    /// payload's `meta` block, not the `assumptions` block.
    pub fmv_locked: bool,
}

impl Default for Assumptions {
    fn default() -> Self {
        let total_shares = DEFAULT_TOTAL_SHARES;
        let post_money = DEFAULT_POST_MONEY;
        Self {
            total_shares_outstanding: total_shares,
            post_money_valuation: post_money,
            fmv: derive_fmv(post_money, total_shares).unwrap_or(0.0),
            conversion_date: default_conversion_date(),
            tax_rate: DEFAULT_TAX_RATE,
            growth_rate: DEFAULT_GROWTH_RATE,
            fmv_locked: false,
        }
    }
}

impl Assumptions {
    /// Restores all fields to the documented defaults and clears the FMV
    /// lock, forcing an unlocked re-derivation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Applies one typed assumption edit, re-sanitizing the raw value.
    ///
    /// Returns whether observable state changed (field value or lock).
    pub fn apply(&mut self, edit: AssumptionEdit) -> bool {
        match edit {
            AssumptionEdit::TotalShares(raw) => {
                let total = sanitize_total_shares(raw);
                let changed = total != self.total_shares_outstanding;
                self.total_shares_outstanding = total;
                if changed {
                    self.rederive_fmv_unlocked();
                }
                changed
            }
            AssumptionEdit::PostMoney(raw) => {
                let valuation = sanitize_valuation(raw);
                let changed = valuation != self.post_money_valuation;
                self.post_money_valuation = valuation;
                if changed {
                    self.rederive_fmv_unlocked();
                }
                changed
            }
            AssumptionEdit::Fmv(raw) => {
                let fmv = sanitize_fmv(raw);
                let changed = fmv != self.fmv || !self.fmv_locked;
                self.fmv = fmv;
                self.fmv_locked = true;
                changed
            }
            AssumptionEdit::ConversionDate(raw) => {
                let date = sanitize_conversion_date(&raw);
                let changed = date != self.conversion_date;
                self.conversion_date = date;
                changed
            }
            AssumptionEdit::TaxRate(raw) => {
                let rate = sanitize_tax_rate(raw);
                let changed = rate != self.tax_rate;
                self.tax_rate = rate;
                changed
            }
            AssumptionEdit::GrowthRate(raw) => {
                let rate = sanitize_growth_rate(raw);
                let changed = rate != self.growth_rate;
                self.growth_rate = rate;
                changed
            }
        }
    }

    fn rederive_fmv_unlocked(&mut self) {
        if self.fmv_locked {
            return;
        }
        if let Some(fmv) = derive_fmv(self.post_money_valuation, self.total_shares_outstanding) {
            self.fmv = fmv;
        }
    }
}

/// Typed field-edit command for the global assumptions.
#[derive(Debug, Clone, PartialEq)]
pub enum AssumptionEdit {
    TotalShares(f64),
    PostMoney(f64),
    Fmv(f64),
    ConversionDate(String),
    TaxRate(f64),
    GrowthRate(f64),
}

/// Derives per-share FMV from valuation and share count.
///
/// Returns `None` when `total_shares` is zero; sanitized inputs always
/// yield `Some`.
pub fn derive_fmv(post_money: f64, total_shares: u64) -> Option<f64> {
    if total_shares == 0 {
        return None;
    }
    Some(sanitize_valuation(post_money) / total_shares as f64)
}

/// Clamps shares outstanding into `[1, MAX_SHARES]`, flooring fractions.
/// Non-finite input falls back to the documented default rather than the
/// minimum; a one-share company would make the derived FMV meaningless.
pub fn sanitize_total_shares(raw: f64) -> u64 {
    if !raw.is_finite() {
        return DEFAULT_TOTAL_SHARES;
    }
    sanitize_shares(raw)
}

/// Clamps valuation input to be non-negative and finite.
pub fn sanitize_valuation(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    raw.max(0.0)
}

/// Clamps FMV input to be non-negative and finite.
pub fn sanitize_fmv(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    raw.max(0.0)
}

/// Clamps the flat tax rate into `[0, 100]` percent.
pub fn sanitize_tax_rate(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    raw.clamp(MIN_TAX_RATE, MAX_TAX_RATE)
}

/// Clamps the annual growth rate into `[-100, 500]` percent.
pub fn sanitize_growth_rate(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    raw.clamp(MIN_GROWTH_RATE, MAX_GROWTH_RATE)
}

/// Parses raw conversion-date input, falling back to
/// [`default_conversion_date`].
pub fn sanitize_conversion_date(raw: &str) -> NaiveDate {
    parse_iso_date(raw).unwrap_or_else(default_conversion_date)
}
