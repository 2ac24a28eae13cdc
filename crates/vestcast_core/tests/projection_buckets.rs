use chrono::NaiveDate;
use vestcast_core::{
    project, projection_totals, AssumptionEdit, Assumptions, GrantBook, GrantSeed,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn seed(shares: f64, start: &str, years: f64) -> GrantSeed {
    GrantSeed {
        title: None,
        shares: Some(shares),
        start: Some(start.to_string()),
        years: Some(years),
    }
}

fn assert_close(actual: f64, expected: f64, context: &str) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "{context}: expected {expected}, got {actual}"
    );
}

#[test]
fn reference_scenario_clamps_and_compounds() {
    // 70k shares over 7 years from 2024-01-01; conversion 2025-12-01 at
    // FMV 10.00, 35% growth, 42% tax.
    let mut book = GrantBook::new();
    book.add(seed(70_000.0, "2024-01-01", 7.0));
    let assumptions = Assumptions::default();

    let buckets = project(&book, &assumptions);
    let years: Vec<i32> = buckets.keys().copied().collect();
    assert_eq!(years, vec![2025, 2026, 2027, 2028, 2029, 2030, 2031]);

    // 2025-01-01 vest is on or before the conversion date: conversion-year
    // bucket at the base FMV.
    let first = &buckets[&2025];
    assert_eq!(first.shares, 10_000);
    assert_close(first.income, 100_000.0, "2025 income");
    assert_close(first.tax, 42_000.0, "2025 tax");

    // 2026 vest compounds once: 10.00 * 1.35 = 13.50.
    let second = &buckets[&2026];
    assert_eq!(second.shares, 10_000);
    assert_close(second.income, 135_000.0, "2026 income");
    assert_close(second.tax, 56_700.0, "2026 tax");
    assert_close(second.average_fmv(), 13.5, "2026 avg fmv");

    // 2027 compounds twice: 10.00 * 1.35^2 = 18.225.
    assert_close(buckets[&2027].income, 182_250.0, "2027 income");
}

#[test]
fn zero_grants_project_to_an_empty_mapping() {
    let book = GrantBook::new();
    let buckets = project(&book, &Assumptions::default());
    assert!(buckets.is_empty());

    let totals = projection_totals(&buckets);
    assert_eq!(totals.income, 0.0);
    assert_eq!(totals.tax, 0.0);
}

#[test]
fn all_pre_conversion_vesting_collapses_into_the_conversion_year() {
    let mut book = GrantBook::new();
    book.add(seed(3_000.0, "2020-01-01", 3.0));
    let assumptions = Assumptions::default();

    let buckets = project(&book, &assumptions);
    assert_eq!(buckets.len(), 1);

    let bucket = &buckets[&2025];
    assert_eq!(bucket.shares, 3_000);
    assert_close(bucket.income, 30_000.0, "conversion-year income");
    assert_close(bucket.average_fmv(), 10.0, "conversion-year fmv");
}

#[test]
fn post_conversion_vest_in_the_conversion_year_uses_the_base_fmv() {
    let mut book = GrantBook::new();
    book.add(seed(1_000.0, "2024-12-31", 1.0));

    let mut assumptions = Assumptions::default();
    assumptions.apply(AssumptionEdit::ConversionDate("2025-06-01".into()));

    // Vests 2025-12-31, after the conversion date but in the same year:
    // zero growth steps, base FMV.
    let buckets = project(&book, &assumptions);
    assert_eq!(buckets.len(), 1);
    assert_close(buckets[&2025].income, 10_000.0, "same-year income");
}

#[test]
fn negative_growth_compounds_downward() {
    let mut book = GrantBook::new();
    book.add(seed(1_000.0, "2025-06-01", 2.0));

    let mut assumptions = Assumptions::default();
    assumptions.apply(AssumptionEdit::GrowthRate(-50.0));

    let buckets = project(&book, &assumptions);
    // 2026 vest: one step at -50% from 10.00 -> 5.00.
    assert_close(buckets[&2026].income, 5_000.0, "2026 income");
    // 2027 vest: two steps -> 2.50.
    assert_close(buckets[&2027].income, 2_500.0, "2027 income");
}

#[test]
fn buckets_accumulate_across_grants() {
    let mut book = GrantBook::new();
    book.add(seed(10_000.0, "2024-01-01", 2.0));
    book.add(seed(4_000.0, "2025-03-01", 1.0));
    let assumptions = Assumptions::default();

    let buckets = project(&book, &assumptions);

    // First grant vests 2025 (clamped) and 2026; second vests 2026-03-01.
    assert_eq!(buckets[&2025].shares, 5_000);
    assert_eq!(buckets[&2026].shares, 5_000 + 4_000);
    assert_close(
        buckets[&2026].income,
        5_000.0 * 13.5 + 4_000.0 * 13.5,
        "2026 income",
    );

    let totals = projection_totals(&buckets);
    assert_close(
        totals.income,
        5_000.0 * 10.0 + 9_000.0 * 13.5,
        "total income",
    );
    assert_close(totals.tax, totals.income * 0.42, "total tax");
}

#[test]
fn zero_fmv_projects_zero_income() {
    let mut book = GrantBook::new();
    book.add(seed(5_000.0, "2024-01-01", 5.0));

    let mut assumptions = Assumptions::default();
    assumptions.apply(AssumptionEdit::Fmv(0.0));

    let buckets = project(&book, &assumptions);
    assert_eq!(buckets.len(), 5);
    for bucket in buckets.values() {
        assert_eq!(bucket.income, 0.0);
        assert_eq!(bucket.tax, 0.0);
        assert!(bucket.shares > 0);
    }
}
