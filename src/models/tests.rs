#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── Month ─────────────────────────────────────────────────────

#[test]
fn test_month_parse() {
    assert_eq!("2024-01".parse::<Month>().unwrap(), Month::new(2024, 1).unwrap());
    assert_eq!("2024-1".parse::<Month>().unwrap(), Month::new(2024, 1).unwrap());
    assert_eq!(" 2023-12 ".parse::<Month>().unwrap(), Month::new(2023, 12).unwrap());
}

#[test]
fn test_month_parse_invalid() {
    assert!("2024-13".parse::<Month>().is_err());
    assert!("2024".parse::<Month>().is_err());
    assert!("january".parse::<Month>().is_err());
    assert!("".parse::<Month>().is_err());
}

#[test]
fn test_month_new_rejects_out_of_range() {
    assert!(Month::new(2024, 0).is_none());
    assert!(Month::new(2024, 13).is_none());
    assert!(Month::new(2024, 12).is_some());
}

#[test]
fn test_month_ordering() {
    let dec23 = Month::new(2023, 12).unwrap();
    let jan24 = Month::new(2024, 1).unwrap();
    let feb24 = Month::new(2024, 2).unwrap();
    assert!(dec23 < jan24);
    assert!(jan24 < feb24);
}

#[test]
fn test_month_labels() {
    let m = Month::new(2024, 3).unwrap();
    assert_eq!(m.key(), "2024-03");
    assert_eq!(format!("{m}"), "2024-03");
    assert_eq!(m.short_label(), "Mar 2024");
}

#[test]
fn test_month_parse_error_message() {
    let err = "nope".parse::<Month>().unwrap_err();
    assert!(err.to_string().contains("nope"));
}

// ── Cell ──────────────────────────────────────────────────────

#[test]
fn test_label_cell_counts_as_zero() {
    let cell = Cell::label("Sales", false);
    assert_eq!(cell.amount_or_zero(), Decimal::ZERO);
    assert_eq!(cell.label_text(), Some("Sales"));
    assert!(!cell.focusable);
}

#[test]
fn test_amount_cell() {
    let cell = Cell::amount(dec!(12.50), true);
    assert_eq!(cell.amount_or_zero(), dec!(12.50));
    assert!(cell.label_text().is_none());
    assert!(cell.editable);
    assert!(cell.focusable);
}

// ── Level ─────────────────────────────────────────────────────

#[test]
fn test_level_child() {
    assert_eq!(Level::Root.child(), Some(Level::Parent));
    assert_eq!(Level::Parent.child(), Some(Level::Leaf));
    assert_eq!(Level::Leaf.child(), None);
}

#[test]
fn test_kind_display() {
    assert_eq!(format!("{}", CategoryKind::Income), "Income");
    assert_eq!(format!("{}", CategoryKind::Expense), "Expense");
}
