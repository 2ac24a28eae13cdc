//! Calendar date parsing and anniversary arithmetic.
//!
//! # Responsibility
//! - Parse strict ISO `YYYY-MM-DD` field input.
//! - Step dates forward by whole years for vesting anniversaries.
//!
//! # Invariants
//! - `parse_iso_date` never panics, whatever the input shape.
//! - `add_years` lands a Feb 29 anniversary of a non-leap target year on
//!   Mar 1, not Feb 28.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Parses strict `YYYY-MM-DD` input.
///
/// Returns `None` for any shape or calendar failure. Callers substitute
/// their documented default date; a bad date is never an error.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if !ISO_DATE_RE.is_match(trimmed) {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Steps `date` forward by `years` whole years.
///
/// Feb 29 anniversaries roll over into Mar 1 when the target year is not
/// a leap year.
pub fn add_years(date: NaiveDate, years: u32) -> NaiveDate {
    let target_year = date.year() + years as i32;
    NaiveDate::from_ymd_opt(target_year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(target_year, 3, 1))
        .unwrap_or(date)
}
