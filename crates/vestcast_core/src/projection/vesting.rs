//! Vesting event generation.
//!
//! # Responsibility
//! - Expand one grant into its yearly vesting schedule.
//!
//! # Invariants
//! - Generated tranche shares sum exactly to the grant's share count.
//! - The integer-division remainder lands entirely on the final tranche.

use crate::dates::add_years;
use chrono::{Datelike, NaiveDate};

/// One year's tranche of shares becoming vested.
///
/// Ephemeral and derived; never persisted, recomputed on every
/// projection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VestingEvent {
    /// Calendar year of the vest date.
    pub year: i32,
    /// Anniversary date the tranche vests on.
    pub date: NaiveDate,
    /// Shares vesting at this event.
    pub shares: u64,
}

/// Expands a grant into `years` yearly vesting events starting one year
/// after `start`.
///
/// Each event carries `shares / years` tranche shares; the remainder is
/// added entirely to the final event so the tranches sum exactly to
/// `shares`. A zero `years` input yields an empty schedule; sanitized
/// callers cannot produce it.
pub fn vesting_events(shares: u64, years: u32, start: NaiveDate) -> Vec<VestingEvent> {
    if years == 0 {
        return Vec::new();
    }

    let per_year = shares / u64::from(years);
    let remainder = shares % u64::from(years);

    (1..=years)
        .map(|step| {
            let date = add_years(start, step);
            let tranche = if step == years {
                per_year + remainder
            } else {
                per_year
            };
            VestingEvent {
                year: date.year(),
                date,
                shares: tranche,
            }
        })
        .collect()
}
