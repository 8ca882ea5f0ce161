#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn user(db: &Database, name: &str, email: &str) -> User {
    let mut user = User::new(name.into(), email.into());
    user.id = Some(db.insert_user(&user).unwrap());
    user
}

fn run(args: &[&str], db: &mut Database, user: &User) -> Result<()> {
    let mut full = vec!["groupsave".to_string()];
    full.extend(args.iter().map(|a| a.to_string()));
    as_cli(&full, db, user)
}

/// A plan of `owner` with one participant and one contribution.
fn plan_with_contribution(db: &Database, owner: &User) -> (i64, i64) {
    let plan = SavingsPlan::new(
        owner.id.unwrap(),
        "Trip".into(),
        dec!(1200),
        d(2024, 1, 1),
        d(2024, 12, 31),
    )
    .unwrap();
    let plan_id = db.insert_plan(&plan).unwrap();
    let who = db
        .insert_participant(&Participant::new(plan_id, "Ana".into(), String::new()))
        .unwrap();
    let id = db
        .insert_contribution(&Contribution::new(plan_id, who, "jan".into(), d(2024, 1, 5), dec!(100)))
        .unwrap();
    (plan_id, id)
}

#[test]
fn test_contrib_delete_requires_owner() {
    let mut db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice", "alice@example.com");
    let bob = user(&db, "Bob", "bob@example.com");
    let (plan_id, id) = plan_with_contribution(&db, &alice);

    assert!(run(&["contrib", "delete", &id.to_string()], &mut db, &bob).is_err());
    assert_eq!(db.get_contributions(plan_id).unwrap().len(), 1);

    run(&["contrib", "delete", &id.to_string()], &mut db, &alice).unwrap();
    assert!(db.get_contributions(plan_id).unwrap().is_empty());
}

#[test]
fn test_plan_delete_requires_owner() {
    let mut db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice", "alice@example.com");
    let bob = user(&db, "Bob", "bob@example.com");
    let (plan_id, _) = plan_with_contribution(&db, &alice);

    assert!(run(&["plan", "delete", &plan_id.to_string()], &mut db, &bob).is_err());
    assert!(db.get_plan(plan_id).unwrap().is_some());
}

#[test]
fn test_simulate_range_without_create_saves_nothing() {
    let mut db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice", "alice@example.com");

    run(
        &["simulate", "range", "2024-01-01", "2024-12-31", "1200", "12", "3"],
        &mut db,
        &alice,
    )
    .unwrap();
    assert!(db.get_plans(alice.id.unwrap()).unwrap().is_empty());
}

#[test]
fn test_simulate_range_create_saves_plan() {
    let mut db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice", "alice@example.com");

    run(
        &[
            "simulate", "range", "01/03/2024", "2024-08-31", "600", "6", "2", "--create", "Beach",
            "house",
        ],
        &mut db,
        &alice,
    )
    .unwrap();

    let plans = db.get_plans(alice.id.unwrap()).unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].description, "Beach house");
    assert_eq!(plans[0].target, dec!(600));
    assert_eq!(plans[0].period_months().unwrap(), 6);
}

#[test]
fn test_simulate_range_rejects_bad_input() {
    let mut db = Database::open_in_memory().unwrap();
    let alice = user(&db, "Alice", "alice@example.com");

    // Inverted range
    let inverted = ["simulate", "range", "2024-12-01", "2024-01-01", "600", "6", "2", "--create", "X"];
    assert!(run(&inverted, &mut db, &alice).is_err());
    // Missing description
    let unnamed = ["simulate", "range", "2024-01-01", "2024-06-30", "600", "6", "2", "--create"];
    assert!(run(&unnamed, &mut db, &alice).is_err());
    assert!(db.get_plans(alice.id.unwrap()).unwrap().is_empty());
}
