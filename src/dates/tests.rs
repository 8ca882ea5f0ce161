#![allow(clippy::unwrap_used)]

use super::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ── months_between ────────────────────────────────────────────

#[test]
fn test_months_between_ignores_day() {
    assert_eq!(months_between(d(2024, 1, 31), d(2024, 2, 1)), 1);
    assert_eq!(months_between(d(2024, 1, 1), d(2024, 1, 31)), 0);
}

#[test]
fn test_months_between_across_years() {
    assert_eq!(months_between(d(2023, 11, 10), d(2025, 2, 3)), 15);
}

#[test]
fn test_months_between_negative() {
    assert_eq!(months_between(d(2024, 3, 1), d(2023, 12, 25)), -3);
}

// ── month_span ────────────────────────────────────────────────

#[test]
fn test_month_span_same_month() {
    assert_eq!(month_span(d(2024, 1, 15), d(2024, 1, 31)).unwrap(), 1);
}

#[test]
fn test_month_span_full_year() {
    assert_eq!(month_span(d(2024, 1, 1), d(2024, 12, 31)).unwrap(), 12);
}

#[test]
fn test_month_span_year_boundary() {
    assert_eq!(month_span(d(2024, 1, 1), d(2025, 1, 1)).unwrap(), 13);
}

#[test]
fn test_month_span_single_day() {
    assert_eq!(month_span(d(2024, 6, 6), d(2024, 6, 6)).unwrap(), 1);
}

#[test]
fn test_month_span_inverted_range() {
    let err = month_span(d(2024, 5, 1), d(2024, 4, 30)).unwrap_err();
    assert!(matches!(err, CoreError::Domain(_)));
}

// ── month_name ────────────────────────────────────────────────

#[test]
fn test_month_name_table() {
    let names: Vec<&str> = (1..=12).map(|i| month_name(i).unwrap()).collect();
    assert_eq!(
        names,
        ["jan", "fev", "mar", "abr", "maio", "jun", "jul", "ago", "set", "out", "nov", "dez"]
    );
}

#[test]
fn test_month_name_out_of_range() {
    assert!(matches!(month_name(0), Err(CoreError::Domain(_))));
    assert!(matches!(month_name(13), Err(CoreError::Domain(_))));
}

// ── month_labels ──────────────────────────────────────────────

#[test]
fn test_month_labels_wraps_december() {
    assert_eq!(
        month_labels(d(2024, 11, 1), 4),
        vec!["nov", "dez", "jan", "fev"]
    );
}

#[test]
fn test_month_labels_december_start() {
    // December must not be skipped at the wrap point
    assert_eq!(month_labels(d(2024, 12, 20), 2), vec!["dez", "jan"]);
}

#[test]
fn test_month_labels_empty() {
    assert!(month_labels(d(2024, 1, 1), 0).is_empty());
}
