//! Grant record and field sanitizers.
//!
//! # Responsibility
//! - Define the canonical grant record owned by [`crate::GrantBook`].
//! - Sanitize raw share/date/year/title input into in-range values.
//! - Express field edits as typed commands instead of string keys.
//!
//! # Invariants
//! - `id` is positive, unique and never reused across removals.
//! - `shares` stays in `[1, MAX_SHARES]`, `years` in `[1, 100]`.
//! - `start` is always a real calendar date; unparseable input falls back
//!   to [`default_start_date`].

use crate::dates::parse_iso_date;
use chrono::NaiveDate;

/// Display labels longer than this are truncated, matching the input
/// widget's own limit.
pub const MAX_TITLE_CHARS: usize = 60;

/// Largest accepted share count. Income math runs in `f64`, so share
/// counts must stay exactly representable there.
pub const MAX_SHARES: u64 = 9_007_199_254_740_991;

/// Bounds for the vesting duration in years.
pub const MIN_VESTING_YEARS: u32 = 1;
pub const MAX_VESTING_YEARS: u32 = 100;

/// Seed values for a freshly added grant with no overrides.
pub const DEFAULT_GRANT_SHARES: u64 = 70_000;
pub const DEFAULT_VESTING_YEARS: u32 = 7;

/// Fallback start date for unparseable date input.
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid default start date")
}

/// One equity grant vesting over a fixed number of years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Positive, monotonically assigned by the owning book, never reused.
    pub id: u64,
    /// Total shares granted, split across `years` vesting tranches.
    pub shares: u64,
    /// Grant start date; the first tranche vests one year later.
    pub start: NaiveDate,
    /// Vesting duration in whole years.
    pub years: u32,
    /// Optional display label; empty means "use a positional default".
    pub title: String,
}

impl Grant {
    /// Returns the label to display for this grant at list position
    /// `position` (zero-based), falling back to `Grant N` for blank titles.
    pub fn display_title(&self, position: usize) -> String {
        if self.title.trim().is_empty() {
            format!("Grant {}", position + 1)
        } else {
            self.title.clone()
        }
    }

    /// Applies one typed field edit, re-sanitizing the raw value.
    ///
    /// Returns whether the stored value actually changed; callers use the
    /// report to skip redundant recompute/persist passes.
    pub fn apply(&mut self, edit: GrantEdit) -> bool {
        match edit {
            GrantEdit::Title(raw) => {
                let title = sanitize_title(&raw);
                let changed = title != self.title;
                self.title = title;
                changed
            }
            GrantEdit::Shares(raw) => {
                let shares = sanitize_shares(raw);
                let changed = shares != self.shares;
                self.shares = shares;
                changed
            }
            GrantEdit::Start(raw) => {
                let start = sanitize_start(&raw);
                let changed = start != self.start;
                self.start = start;
                changed
            }
            GrantEdit::Years(raw) => {
                let years = sanitize_years(raw);
                let changed = years != self.years;
                self.years = years;
                changed
            }
        }
    }
}

/// Typed field-edit command for one grant.
///
/// Raw payloads carry presentation-layer input verbatim; sanitization
/// happens inside [`Grant::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum GrantEdit {
    Title(String),
    Shares(f64),
    Start(String),
    Years(f64),
}

/// Raw override values for adding a grant; unset fields use the
/// documented defaults.
#[derive(Debug, Clone, Default)]
pub struct GrantSeed {
    pub title: Option<String>,
    pub shares: Option<f64>,
    pub start: Option<String>,
    pub years: Option<f64>,
}

/// Clamps raw share input into `[1, MAX_SHARES]`, flooring fractions.
/// Non-finite input collapses to the minimum of one share.
pub fn sanitize_shares(raw: f64) -> u64 {
    if !raw.is_finite() {
        return 1;
    }
    let floored = raw.floor();
    if floored < 1.0 {
        1
    } else if floored >= MAX_SHARES as f64 {
        MAX_SHARES
    } else {
        floored as u64
    }
}

/// Clamps raw vesting-year input into `[1, 100]`, flooring fractions.
pub fn sanitize_years(raw: f64) -> u32 {
    if !raw.is_finite() {
        return MIN_VESTING_YEARS;
    }
    let floored = raw.floor();
    if floored < f64::from(MIN_VESTING_YEARS) {
        MIN_VESTING_YEARS
    } else if floored > f64::from(MAX_VESTING_YEARS) {
        MAX_VESTING_YEARS
    } else {
        floored as u32
    }
}

/// Parses raw date input, falling back to [`default_start_date`].
pub fn sanitize_start(raw: &str) -> NaiveDate {
    parse_iso_date(raw).unwrap_or_else(default_start_date)
}

/// Truncates the label to [`MAX_TITLE_CHARS`] characters.
pub fn sanitize_title(raw: &str) -> String {
    raw.chars().take(MAX_TITLE_CHARS).collect()
}
