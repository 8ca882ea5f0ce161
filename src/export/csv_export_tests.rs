#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::ledger::build_monthly_matrix;
use crate::models::{Contribution, Participant};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn participant(id: i64, name: &str) -> Participant {
    let mut p = Participant::new(1, name.into(), String::new());
    p.id = Some(id);
    p
}

fn sample_matrix() -> MonthlyMatrix {
    let people = vec![participant(1, "A"), participant(2, "B")];
    let contribs = vec![
        Contribution::new(1, 1, "x".into(), d(2024, 11, 3), dec!(50)),
        Contribution::new(1, 1, "x".into(), d(2024, 12, 3), dec!(20)),
        Contribution::new(1, 2, "x".into(), d(2024, 12, 9), dec!(30.5)),
    ];
    build_monthly_matrix(d(2024, 11, 1), d(2025, 1, 31), &people, &contribs).unwrap()
}

#[test]
fn test_write_matrix_layout() {
    let mut buf = Vec::new();
    write_matrix(&sample_matrix(), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "participant,nov,dez,jan,total");
    assert_eq!(lines[1], "A,50,20,0,70");
    assert_eq!(lines[2], "B,0,30.5,0,30.5");
    assert_eq!(lines[3], "total,50,50.5,0,100.5");
}

#[test]
fn test_write_matrix_no_participants() {
    let m = build_monthly_matrix(d(2024, 1, 1), d(2024, 2, 1), &[], &[]).unwrap();
    let mut buf = Vec::new();
    write_matrix(&m, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text, "participant,jan,fev,total\ntotal,0,0,0\n");
}

#[test]
fn test_write_matrix_to_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.csv");
    write_matrix_to_path(&sample_matrix(), &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.len(), 5);
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[2][0], "total");
}
