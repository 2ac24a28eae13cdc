use chrono::NaiveDate;
use vestcast_core::vesting_events;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn even_split_yields_equal_tranches() {
    let events = vesting_events(70_000, 7, date(2024, 1, 1));

    assert_eq!(events.len(), 7);
    for (index, event) in events.iter().enumerate() {
        assert_eq!(event.shares, 10_000);
        assert_eq!(event.date, date(2025 + index as i32, 1, 1));
        assert_eq!(event.year, 2025 + index as i32);
    }
}

#[test]
fn remainder_lands_entirely_on_the_final_tranche() {
    let events = vesting_events(10, 3, date(2024, 1, 1));
    let shares: Vec<u64> = events.iter().map(|event| event.shares).collect();
    assert_eq!(shares, vec![3, 3, 4]);

    let events = vesting_events(1, 5, date(2024, 1, 1));
    let shares: Vec<u64> = events.iter().map(|event| event.shares).collect();
    assert_eq!(shares, vec![0, 0, 0, 0, 1]);
}

#[test]
fn tranches_always_sum_to_the_grant_exactly() {
    let start = date(2023, 6, 15);
    for shares in [1, 7, 99, 1_000, 70_000, 1_000_001] {
        for years in [1, 2, 3, 7, 50, 100] {
            let events = vesting_events(shares, years, start);
            assert_eq!(events.len(), years as usize);
            let total: u64 = events.iter().map(|event| event.shares).sum();
            assert_eq!(total, shares, "shares={shares} years={years}");
        }
    }
}

#[test]
fn leap_day_start_rolls_into_march_on_non_leap_years() {
    let events = vesting_events(400, 4, date(2024, 2, 29));

    assert_eq!(events[0].date, date(2025, 3, 1));
    assert_eq!(events[1].date, date(2026, 3, 1));
    assert_eq!(events[2].date, date(2027, 3, 1));
    assert_eq!(events[3].date, date(2028, 2, 29));
}

#[test]
fn zero_years_yields_an_empty_schedule() {
    assert!(vesting_events(100, 0, date(2024, 1, 1)).is_empty());
}
