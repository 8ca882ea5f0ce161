#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn close(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < dec!(0.000000000001)
}

// ── Zero yield ────────────────────────────────────────────────

#[test]
fn test_zero_yield_basic() {
    let r = compute_zero_yield(dec!(1200), 12, 4).unwrap();
    assert_eq!(r.total_per_month, dec!(100));
    assert_eq!(r.per_participant, dec!(25));
    assert_eq!(r.accumulated, dec!(1200));
}

#[test]
fn test_zero_yield_accumulated_is_target() {
    for (g, n, p) in [(dec!(1000), 3, 7), (dec!(0.01), 1, 1), (dec!(98765.43), 36, 5)] {
        let r = compute_zero_yield(g, n, p).unwrap();
        assert_eq!(r.accumulated, g);
        let back = r.per_participant * Decimal::from(n) * Decimal::from(p);
        assert!(close(back, g), "{back} != {g}");
    }
}

#[test]
fn test_zero_yield_rejects_zero_installments() {
    let err = compute_zero_yield(dec!(100), 0, 2).unwrap_err();
    assert!(matches!(err, CoreError::Domain(_)));
}

#[test]
fn test_zero_yield_rejects_zero_participants() {
    assert!(matches!(
        compute_zero_yield(dec!(100), 2, 0),
        Err(CoreError::Domain(_))
    ));
}

#[test]
fn test_zero_yield_rejects_non_positive_target() {
    assert!(compute_zero_yield(Decimal::ZERO, 2, 2).is_err());
    assert!(compute_zero_yield(dec!(-10), 2, 2).is_err());
}

// ── Compound yield ────────────────────────────────────────────

#[test]
fn test_compound_known_value() {
    let r = compute_compound_yield(dec!(1200), dec!(0.01), 12, 1).unwrap();
    assert_eq!(r.total_per_month, dec!(100));
    assert_eq!(r.per_participant, dec!(100));
    assert_eq!(r.rounded().accumulated, dec!(1268.25));
    // Not the target: the projection is derived, not solved
    assert!(r.accumulated > dec!(1200));
}

#[test]
fn test_compound_zero_rate_degenerates_to_linear() {
    for (g, t, p) in [(dec!(1200), 12, 3), (dec!(1000), 7, 2), (dec!(50), 1, 1)] {
        let r = compute_compound_yield(g, Decimal::ZERO, t, p).unwrap();
        assert!(close(r.accumulated, g), "{} != {g}", r.accumulated);
    }
}

#[test]
fn test_compound_splits_between_participants() {
    let r = compute_compound_yield(dec!(3000), dec!(0.005), 10, 3).unwrap();
    assert_eq!(r.total_per_month, dec!(300));
    assert_eq!(r.per_participant, dec!(100));
}

#[test]
fn test_compound_rejects_bad_input() {
    assert!(compute_compound_yield(dec!(100), dec!(0.01), 0, 1).is_err());
    assert!(compute_compound_yield(dec!(100), dec!(0.01), 12, 0).is_err());
    assert!(compute_compound_yield(dec!(0), dec!(0.01), 12, 1).is_err());
    assert!(matches!(
        compute_compound_yield(dec!(100), dec!(-0.01), 12, 1),
        Err(CoreError::Domain(_))
    ));
}

#[test]
fn test_compound_overflow_is_domain_error() {
    let err = compute_compound_yield(dec!(1000), dec!(1000), 5000, 1).unwrap_err();
    assert!(matches!(err, CoreError::Domain(_)));
}

#[test]
fn test_projection_is_deterministic() {
    let a = compute_compound_yield(dec!(5000), dec!(0.0075), 24, 3).unwrap();
    let b = compute_compound_yield(dec!(5000), dec!(0.0075), 24, 3).unwrap();
    assert_eq!(a, b);
    let z1 = compute_zero_yield(dec!(1000), 3, 7).unwrap();
    let z2 = compute_zero_yield(dec!(1000), 3, 7).unwrap();
    assert_eq!(z1, z2);
}

#[test]
fn test_trait_objects() {
    let policies: Vec<Box<dyn Projection>> = vec![
        Box::new(ZeroYield {
            target: dec!(600),
            installments: 6,
            participants: 2,
        }),
        Box::new(CompoundYield {
            target: dec!(600),
            monthly_rate: Decimal::ZERO,
            period_months: 6,
            participants: 2,
        }),
    ];
    for p in &policies {
        let r = p.project().unwrap();
        assert_eq!(r.per_participant, dec!(50), "{}", p.name());
    }
}

// ── Rates and rounding ────────────────────────────────────────

#[test]
fn test_monthly_rate_conversion() {
    assert_eq!(monthly_rate_from_annual_percent(dec!(12)), dec!(0.01));
    assert_eq!(annual_percent_from_monthly(dec!(0.01)), dec!(12));
}

#[test]
fn test_rounded_only_at_boundary() {
    let r = compute_zero_yield(dec!(100), 3, 1).unwrap();
    assert_ne!(r.total_per_month, dec!(33.33));
    assert_eq!(r.rounded().total_per_month, dec!(33.33));
    let r = compute_zero_yield(dec!(0.05), 2, 1).unwrap();
    assert_eq!(r.rounded().total_per_month, dec!(0.03));
}

// ── Plan driven ───────────────────────────────────────────────

fn plan(start: (i32, u32, u32), end: (i32, u32, u32)) -> SavingsPlan {
    SavingsPlan::new(
        1,
        "Trip".into(),
        dec!(1200),
        NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
        NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
    )
    .unwrap()
}

#[test]
fn test_project_plan_uses_plan_span() {
    let p = plan((2024, 1, 1), (2024, 12, 31));
    let from_plan = project_plan(&p, dec!(12), 1).unwrap();
    let direct = compute_compound_yield(dec!(1200), dec!(0.01), 12, 1).unwrap();
    assert_eq!(from_plan, direct);
    assert_ne!(from_plan.accumulated, p.target);
}

#[test]
fn test_project_plan_single_month() {
    let p = plan((2024, 3, 10), (2024, 3, 20));
    let r = project_plan(&p, dec!(6), 2).unwrap();
    // One installment earns nothing before the period ends
    assert!(close(r.accumulated, dec!(1200)));
    assert_eq!(r.per_participant, dec!(600));
}

// ── Schedule ──────────────────────────────────────────────────

#[test]
fn test_schedule_ends_at_accumulated() {
    let r = compute_compound_yield(dec!(12000), dec!(0.01), 12, 4).unwrap();
    let schedule = accumulation_schedule(r.total_per_month, dec!(0.01), 12).unwrap();
    assert_eq!(schedule.len(), 12);
    assert_eq!(schedule[0], dec!(1000));
    let last = *schedule.last().unwrap();
    assert!((last - r.accumulated).abs() < dec!(0.0000001), "{last}");
}

#[test]
fn test_schedule_zero_rate_is_linear() {
    let schedule = accumulation_schedule(dec!(50), Decimal::ZERO, 3).unwrap();
    assert_eq!(schedule, vec![dec!(50), dec!(100), dec!(150)]);
}

#[test]
fn test_schedule_overflow_is_domain_error() {
    let err = accumulation_schedule(Decimal::MAX, dec!(0.5), 3).unwrap_err();
    assert!(matches!(err, CoreError::Domain(_)));
}
