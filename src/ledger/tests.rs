#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn person(id: i64, name: &str) -> Participant {
    Participant {
        id: Some(id),
        plan_id: 1,
        name: name.into(),
        contact: String::new(),
    }
}

fn entry(participant_id: i64, date: NaiveDate, amount: Decimal) -> Contribution {
    Contribution::new(1, participant_id, "deposit".into(), date, amount)
}

fn sample() -> (Vec<Participant>, Vec<Contribution>) {
    let participants = vec![person(1, "A"), person(2, "B")];
    let contributions = vec![
        entry(1, d(2024, 1, 10), dec!(50)),
        entry(2, d(2024, 2, 5), dec!(30)),
        entry(1, d(2024, 2, 20), dec!(20)),
    ];
    (participants, contributions)
}

#[test]
fn test_matrix_two_participants() {
    let (participants, contributions) = sample();
    let m = build_monthly_matrix(d(2024, 1, 1), d(2024, 2, 29), &participants, &contributions)
        .unwrap();

    assert_eq!(m.months, 2);
    assert_eq!(m.rows.len(), 2);
    assert_eq!(m.rows[0].label, "A");
    assert_eq!(m.rows[0].cells, vec![dec!(50), dec!(20)]);
    assert_eq!(m.rows[1].label, "B");
    assert_eq!(m.rows[1].cells, vec![dec!(0), dec!(30)]);
}

#[test]
fn test_matrix_keeps_participant_order() {
    let participants = vec![person(9, "Zed"), person(3, "Amy"), person(5, "Bob")];
    let m = build_monthly_matrix(d(2024, 1, 1), d(2024, 1, 31), &participants, &[]).unwrap();
    let labels: Vec<&str> = m.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Zed", "Amy", "Bob"]);
}

#[test]
fn test_matrix_independent_of_contribution_order() {
    let (participants, mut contributions) = sample();
    let forward =
        build_monthly_matrix(d(2024, 1, 1), d(2024, 2, 1), &participants, &contributions).unwrap();
    contributions.reverse();
    let backward =
        build_monthly_matrix(d(2024, 1, 1), d(2024, 2, 1), &participants, &contributions).unwrap();
    assert_eq!(forward, backward);
}

#[test]
fn test_matrix_withdrawals_subtract() {
    let participants = vec![person(1, "A")];
    let contributions = vec![
        entry(1, d(2024, 3, 1), dec!(100)),
        entry(1, d(2024, 3, 15), dec!(-40.50)),
    ];
    let m = build_monthly_matrix(d(2024, 3, 1), d(2024, 3, 31), &participants, &contributions)
        .unwrap();
    assert_eq!(m.rows[0].cells, vec![dec!(59.50)]);
}

#[test]
fn test_matrix_no_participants() {
    let m = build_monthly_matrix(d(2024, 1, 1), d(2024, 6, 30), &[], &[]).unwrap();
    assert!(m.rows.is_empty());
    assert_eq!(m.months, 6);
    assert_eq!(m.column_totals(), vec![dec!(0); 6]);
}

#[test]
fn test_matrix_unknown_participant() {
    let participants = vec![person(1, "A")];
    let contributions = vec![entry(7, d(2024, 1, 2), dec!(10))];
    let err = build_monthly_matrix(d(2024, 1, 1), d(2024, 1, 31), &participants, &contributions)
        .unwrap_err();
    assert!(matches!(err, CoreError::Reference { participant: 7, .. }));
}

#[test]
fn test_matrix_unknown_participant_reported_before_range() {
    let participants = vec![person(1, "A")];
    let contributions = vec![
        entry(1, d(2025, 6, 1), dec!(10)),
        entry(7, d(2024, 1, 5), dec!(10)),
    ];
    let err = build_monthly_matrix(d(2024, 1, 1), d(2024, 1, 31), &participants, &contributions)
        .unwrap_err();
    assert!(matches!(err, CoreError::Reference { participant: 7, .. }));
}

#[test]
fn test_matrix_before_start_is_range_error() {
    let participants = vec![person(1, "A")];
    let contributions = vec![entry(1, d(2023, 12, 31), dec!(10))];
    let err = build_monthly_matrix(d(2024, 1, 1), d(2024, 3, 31), &participants, &contributions)
        .unwrap_err();
    assert!(matches!(err, CoreError::Range { .. }));
}

#[test]
fn test_matrix_after_end_is_range_error() {
    let participants = vec![person(1, "A")];
    let contributions = vec![entry(1, d(2024, 4, 1), dec!(10))];
    let err = build_monthly_matrix(d(2024, 1, 1), d(2024, 3, 31), &participants, &contributions)
        .unwrap_err();
    assert!(matches!(err, CoreError::Range { .. }));
}

#[test]
fn test_matrix_same_month_before_start_day_is_range_error() {
    let participants = vec![person(1, "A")];
    let contributions = vec![entry(1, d(2024, 1, 3), dec!(10))];
    let err = build_monthly_matrix(d(2024, 1, 15), d(2024, 3, 31), &participants, &contributions)
        .unwrap_err();
    assert!(matches!(err, CoreError::Range { .. }));
}

#[test]
fn test_matrix_inverted_range() {
    let err = build_monthly_matrix(d(2024, 5, 1), d(2024, 1, 1), &[], &[]).unwrap_err();
    assert!(matches!(err, CoreError::Domain(_)));
}

#[test]
fn test_matrix_totals() {
    let (participants, contributions) = sample();
    let m = build_monthly_matrix(d(2024, 1, 1), d(2024, 3, 31), &participants, &contributions)
        .unwrap();
    assert_eq!(m.column_totals(), vec![dec!(50), dec!(50), dec!(0)]);
    assert_eq!(m.rows[0].total(), dec!(70));
    assert_eq!(m.grand_total(), dec!(100));
    assert_eq!(m.labels(), vec!["jan", "fev", "mar"]);
}

#[test]
fn test_matrix_cell_overflow_is_domain_error() {
    let participants = vec![person(1, "A")];
    let contributions = vec![
        entry(1, d(2024, 1, 2), Decimal::MAX),
        entry(1, d(2024, 1, 3), Decimal::MAX),
    ];
    let err = build_monthly_matrix(d(2024, 1, 1), d(2024, 1, 31), &participants, &contributions)
        .unwrap_err();
    assert!(matches!(err, CoreError::Domain(_)));
}

#[test]
fn test_matrix_total_overflow_is_domain_error() {
    // Each cell fits, the column total does not
    let participants = vec![person(1, "A"), person(2, "B")];
    let contributions = vec![
        entry(1, d(2024, 1, 2), Decimal::MAX),
        entry(2, d(2024, 1, 3), Decimal::MAX),
    ];
    let err = build_monthly_matrix(d(2024, 1, 1), d(2024, 1, 31), &participants, &contributions)
        .unwrap_err();
    assert!(matches!(err, CoreError::Domain(_)));
}
