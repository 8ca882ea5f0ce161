#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::CoreError;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn make_plan() -> SavingsPlan {
    SavingsPlan::new(1, "Beach house".into(), dec!(1000), d(2024, 1, 1), d(2024, 4, 30)).unwrap()
}

// ── SavingsPlan ───────────────────────────────────────────────

#[test]
fn test_plan_new_defaults() {
    let plan = make_plan();
    assert!(plan.id.is_none());
    assert!(plan.participants.is_empty());
    assert!(plan.contributions.is_empty());
    assert_eq!(plan.period_months().unwrap(), 4);
}

#[test]
fn test_plan_rejects_inverted_dates() {
    let err = SavingsPlan::new(1, "x".into(), dec!(10), d(2024, 2, 1), d(2024, 1, 1)).unwrap_err();
    assert!(matches!(err, CoreError::Domain(_)));
}

#[test]
fn test_plans_do_not_share_collections() {
    let mut a = make_plan();
    let b = make_plan();
    a.participants
        .push(Participant::new(1, "Ana".into(), String::new()));
    assert_eq!(a.participants.len(), 1);
    assert!(b.participants.is_empty());
}

#[test]
fn test_plan_month_labels() {
    assert_eq!(
        make_plan().month_labels().unwrap(),
        vec!["jan", "fev", "mar", "abr"]
    );
}

#[test]
fn test_plan_totals_and_progress() {
    let mut plan = make_plan();
    plan.contributions = vec![
        Contribution::new(1, 1, "a".into(), d(2024, 1, 5), dec!(300)),
        Contribution::new(1, 1, "b".into(), d(2024, 2, 5), dec!(-50)),
    ];
    assert_eq!(plan.total_contributed(), dec!(250));
    assert_eq!(plan.progress(), dec!(0.25));

    plan.contributions
        .push(Contribution::new(1, 1, "c".into(), d(2024, 3, 5), dec!(5000)));
    assert_eq!(plan.progress(), Decimal::ONE);
}

#[test]
fn test_plan_monthly_matrix() {
    let mut plan = make_plan();
    let mut ana = Participant::new(1, "Ana".into(), String::new());
    ana.id = Some(10);
    plan.participants.push(ana);
    plan.contributions
        .push(Contribution::new(1, 10, "first".into(), d(2024, 3, 2), dec!(80)));
    let m = plan.monthly_matrix().unwrap();
    assert_eq!(m.rows[0].cells, vec![dec!(0), dec!(0), dec!(80), dec!(0)]);
    assert!(plan.find_participant(10).is_some());
    assert!(plan.find_participant(11).is_none());
}

// ── Participant ───────────────────────────────────────────────

#[test]
fn test_participant_find_by_name() {
    let people = vec![
        Participant::new(1, "Ana".into(), "ana@example.com".into()),
        Participant::new(1, "Bruno".into(), String::new()),
    ];
    assert_eq!(Participant::find_by_name(&people, "bruno").unwrap().name, "Bruno");
    assert!(Participant::find_by_name(&people, "carla").is_none());
    assert_eq!(format!("{}", people[0]), "Ana");
}

// ── Contribution ──────────────────────────────────────────────

#[test]
fn test_contribution_withdrawal() {
    let c = Contribution::new(1, 1, "cash out".into(), d(2024, 1, 1), dec!(-10));
    assert!(c.is_withdrawal());
    let c = Contribution::new(1, 1, "in".into(), d(2024, 1, 1), dec!(10));
    assert!(!c.is_withdrawal());
}

// ── Event ─────────────────────────────────────────────────────

#[test]
fn test_event_parse_starts_at() {
    let expected = d(2024, 6, 1).and_hms_opt(18, 30, 0).unwrap();
    assert_eq!(Event::parse_starts_at("2024-06-01 18:30"), Some(expected));
    assert_eq!(Event::parse_starts_at("2024-06-01T18:30"), Some(expected));
    assert_eq!(Event::parse_starts_at("June 1st"), None);
}

#[test]
fn test_event_is_past() {
    let starts: NaiveDateTime = d(2024, 6, 1).and_hms_opt(12, 0, 0).unwrap();
    let e = Event::new(1, "Pool".into(), String::new(), dec!(20), starts, "Club".into());
    assert!(e.is_past(d(2024, 6, 2).and_hms_opt(0, 0, 0).unwrap()));
    assert!(!e.is_past(d(2024, 5, 31).and_hms_opt(0, 0, 0).unwrap()));
}

// ── User ──────────────────────────────────────────────────────

#[test]
fn test_user_normalizes_email() {
    let u = User::new("Ana".into(), "  Ana@Example.COM ".into());
    assert_eq!(u.email, "ana@example.com");
    assert_eq!(format!("{u}"), "Ana <ana@example.com>");
}
