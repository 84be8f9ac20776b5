mod common;
use common::day;
use rfechamento::errors::AppError;
use rfechamento::utils::date::today;
use rfechamento::utils::range::{DateRange, parse_range, resolve_range};

#[test]
fn test_single_day() {
    let r = parse_range("2026-10-19").expect("range");
    assert_eq!(r, DateRange::single(day(2026, 10, 19)));
    assert_eq!(r.label(), "19/10/2026");
}

#[test]
fn test_month_and_year() {
    let feb = parse_range("2024-02").expect("range");
    assert_eq!(feb.start, day(2024, 2, 1));
    assert_eq!(feb.end, day(2024, 2, 29));

    let year = parse_range("2026").expect("range");
    assert_eq!(year.start, day(2026, 1, 1));
    assert_eq!(year.end, day(2026, 12, 31));
}

#[test]
fn test_spans() {
    let r = parse_range("2026-09:2026-10").expect("range");
    assert_eq!(r.start, day(2026, 9, 1));
    assert_eq!(r.end, day(2026, 10, 31));
    assert_eq!(r.label(), "01/09/2026 a 31/10/2026");
    assert!(r.contains(day(2026, 10, 19)));
    assert!(!r.contains(day(2026, 11, 1)));
}

#[test]
fn test_today_default() {
    assert_eq!(resolve_range(None).expect("range"), DateRange::single(today()));
    assert_eq!(
        parse_range("today").expect("range"),
        DateRange::single(today())
    );
}

#[test]
fn test_invalid_ranges() {
    for bad in [
        "2026-13",
        "2026-10-32",
        "2026:2026-10",
        "2026-10-20:2026-10-19",
        "ontem",
        "19/10/2026",
        "2026-1é",
    ] {
        let err = parse_range(bad).unwrap_err();
        assert!(
            matches!(err, AppError::InvalidRange(_)),
            "{bad} should be rejected"
        );
    }
}
