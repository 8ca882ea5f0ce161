#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::util::*;

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_grouping() {
    assert_eq!(format_amount(dec!(1234567.89)), "R$ 1.234.567,89");
    assert_eq!(format_amount(dec!(999)), "R$ 999,00");
    assert_eq!(format_amount(dec!(0)), "R$ 0,00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-1500.5)), "-R$ 1.500,50");
}

#[test]
fn test_format_amount_rounds_half_away_from_zero() {
    assert_eq!(format_amount(dec!(1268.2465)), "R$ 1.268,25");
    assert_eq!(format_amount(dec!(0.005)), "R$ 0,01");
    assert_eq!(format_amount(dec!(-0.005)), "-R$ 0,01");
}

#[test]
fn test_format_rate() {
    assert_eq!(format_rate(dec!(0.01)), "1% a.m.");
    assert_eq!(format_rate(dec!(0.0125)), "1.25% a.m.");
}

#[test]
fn test_progress_bar() {
    assert_eq!(progress_bar(dec!(0.5), 4), "██░░");
    assert_eq!(progress_bar(dec!(2), 3), "███");
    assert_eq!(progress_bar(dec!(-1), 3), "░░░");
}

// ── parsing ───────────────────────────────────────────────────

#[test]
fn test_parse_amount_formats() {
    assert_eq!(parse_amount("1234.56"), Some(dec!(1234.56)));
    assert_eq!(parse_amount("1234,56"), Some(dec!(1234.56)));
    assert_eq!(parse_amount("R$ 1.234,56"), Some(dec!(1234.56)));
    assert_eq!(parse_amount("-50"), Some(dec!(-50)));
}

#[test]
fn test_parse_amount_invalid() {
    assert_eq!(parse_amount(""), None);
    assert_eq!(parse_amount("abc"), None);
}

#[test]
fn test_parse_date_formats() {
    let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    assert_eq!(parse_date("2024-03-15"), Some(expected));
    assert_eq!(parse_date("15/03/2024"), Some(expected));
    assert_eq!(parse_date("2024-02-30"), None);
}

#[test]
fn test_parse_count_rejects_zero() {
    assert_eq!(parse_count("3"), Some(3));
    assert_eq!(parse_count("0"), None);
    assert_eq!(parse_count("-1"), None);
}

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate() {
    assert_eq!(truncate("hello", 10), "hello");
    assert_eq!(truncate("hello world", 5), "hell…");
    assert_eq!(truncate("hello", 0), "");
    assert_eq!(truncate("poupança", 5), "poup…");
}

// ── scroll helpers ────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut idx, mut scroll) = (2, 0);
    scroll_down(&mut idx, &mut scroll, 10, 3);
    assert_eq!((idx, scroll), (3, 1));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut idx, mut scroll) = (4, 2);
    scroll_down(&mut idx, &mut scroll, 5, 3);
    assert_eq!((idx, scroll), (4, 2));
}

#[test]
fn test_scroll_up_moves_window() {
    let (mut idx, mut scroll) = (3, 3);
    scroll_up(&mut idx, &mut scroll);
    assert_eq!((idx, scroll), (2, 2));
}

#[test]
fn test_clamp_index() {
    let mut idx = 5;
    clamp_index(&mut idx, 3);
    assert_eq!(idx, 2);
    clamp_index(&mut idx, 0);
    assert_eq!(idx, 0);
}
