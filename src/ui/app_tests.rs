#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::app::*;
use super::commands::handle_command;
use crate::grid::{GridEvent, Position};
use crate::models::Month;

fn app() -> App {
    App::new(
        "2024-01".parse::<Month>().unwrap(),
        "2024-03".parse::<Month>().unwrap(),
    )
}

fn focus(app: &mut App, row: usize, col: usize) {
    app.state.focus = Position::new(row, col);
}

fn type_text(app: &mut App, text: &str) {
    app.edit_buffer.push_str(text);
}

fn value_of(app: &App, name: &str, month: usize) -> rust_decimal::Decimal {
    app.sheet
        .tree()
        .walk()
        .into_iter()
        .find(|c| c.name == name)
        .unwrap()
        .month_value(month)
}

// ── Amount editing ────────────────────────────────────────────

#[test]
fn test_typed_digit_starts_amount_edit() {
    let mut app = app();
    focus(&mut app, 0, 1);
    app.begin_edit(Some('4'));
    assert_eq!(app.input_mode, InputMode::Editing);
    type_text(&mut app, "2");
    assert!(app.commit_edit());

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(value_of(&app, "Sales", 1), dec!(42));
    assert_eq!(app.sheet.tree().roots()[0].aggregate(), dec!(42));
}

#[test]
fn test_enter_loads_current_value() {
    let mut app = app();
    focus(&mut app, 0, 1);
    app.begin_edit(Some('7'));
    type_text(&mut app, "5.50");
    app.commit_edit();

    app.begin_edit(None);
    assert_eq!(app.edit_buffer, "75.5");
    assert_eq!(
        app.edit_target,
        Some(EditTarget::Amount {
            category: app.focused().unwrap().category,
            month: 1
        })
    );
}

#[test]
fn test_invalid_amount_leaves_cell() {
    let mut app = app();
    focus(&mut app, 0, 0);
    app.begin_edit(None);
    type_text(&mut app, "lots");
    assert!(!app.commit_edit());
    assert!(app.status_message.contains("Invalid amount"));
    assert_eq!(value_of(&app, "Sales", 0), dec!(0));
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_amount_too_large_is_refused() {
    let max = "79228162514264337593543950335";
    let mut app = app();
    focus(&mut app, 0, 0);
    app.begin_edit(Some('7'));
    type_text(&mut app, &max[1..]);
    assert!(app.commit_edit());

    focus(&mut app, 1, 0);
    app.begin_edit(Some('7'));
    type_text(&mut app, &max[1..]);
    assert!(!app.commit_edit());

    assert_eq!(app.status_message, "Amount too large, totals would overflow");
    assert_eq!(value_of(&app, "Commission", 0), dec!(0));
    assert_eq!(app.sheet.tree().roots()[0].aggregate(), rust_decimal::Decimal::MAX);
}

#[test]
fn test_cancel_edit_discards_buffer() {
    let mut app = app();
    app.begin_edit(Some('9'));
    app.cancel_edit();
    assert!(app.edit_buffer.is_empty());
    assert!(app.edit_target.is_none());
    assert_eq!(value_of(&app, "Sales", 0), dec!(0));
}

// ── Adding categories ─────────────────────────────────────────

#[test]
fn test_typing_on_placeholder_adds_category() {
    let mut app = app();
    focus(&mut app, 2, 0);
    assert!(app.on_placeholder());
    app.begin_edit(Some('G'));
    type_text(&mut app, "rants");
    assert!(app.commit_edit());

    assert_eq!(app.status_message, "Added: Grants");
    assert_eq!(app.focused_category().unwrap().name, "Grants");
    assert_eq!(app.focused().unwrap().cell, 1);
}

#[test]
fn test_blank_name_restores_prompt() {
    let mut app = app();
    focus(&mut app, 2, 0);
    app.begin_edit(None);
    type_text(&mut app, "   ");
    assert!(!app.commit_edit());

    assert_eq!(app.status_message, "Type a name before adding a category");
    let placeholder = app.focused_category().unwrap();
    assert!(placeholder.is_placeholder);
    assert_eq!(placeholder.display_label(), "Add new General Income category");
}

#[test]
fn test_real_label_cannot_be_edited() {
    let mut app = app();
    // Real leaves expose no label cell, so the focused cell is a month.
    focus(&mut app, 0, 0);
    app.begin_edit(None);
    assert!(matches!(app.edit_target, Some(EditTarget::Amount { .. })));
}

// ── Context menu ──────────────────────────────────────────────

#[test]
fn test_menu_apply_to_all_flow() {
    let mut app = app();
    focus(&mut app, 4, 1);
    let consulting = app.focused().unwrap().category;
    app.dispatch(GridEvent::CellChanged {
        category: consulting,
        month: 1,
        value: dec!(80),
    });

    app.open_menu();
    assert_eq!(app.input_mode, InputMode::Menu);
    app.request_apply_to_all();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert!(app.confirm_message.contains("$80.00"));
    assert!(app.confirm_message.contains("Feb 2024"));

    app.confirm();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.state.context_menu.is_none());
    assert_eq!(
        app.status_message,
        "Applied $80.00 to every month of Consulting"
    );
    for month in 0..3 {
        assert_eq!(value_of(&app, "Consulting", month), dec!(80));
    }
}

#[test]
fn test_menu_delete_row() {
    let mut app = app();
    focus(&mut app, 1, 0);
    app.open_menu();
    app.request_delete();
    assert_eq!(app.confirm_message, "Delete Commission?");
    app.confirm();

    assert_eq!(app.status_message, "Deleted: Commission");
    assert!(app
        .sheet
        .tree()
        .walk()
        .iter()
        .all(|c| c.name != "Commission"));
    assert_eq!(app.sheet.matrix().row_count(), 13);
}

#[test]
fn test_menu_delete_group() {
    let mut app = app();
    focus(&mut app, 0, 0);
    app.open_menu();
    app.request_delete_group();
    assert_eq!(
        app.confirm_message,
        "Delete General Income and its 2 categories?"
    );
    app.confirm();

    let names: Vec<&str> = app
        .sheet
        .tree()
        .walk()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert!(!names.contains(&"General Income"));
    assert!(!names.contains(&"Sales"));
    assert_eq!(app.sheet.matrix().row_count(), 11);
}

#[test]
fn test_cancel_confirm_keeps_row() {
    let mut app = app();
    focus(&mut app, 0, 0);
    app.open_menu();
    app.request_delete();
    app.cancel_confirm();

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.state.context_menu.is_none());
    assert!(app.pending_action.is_none());
    assert_eq!(app.status_message, "Cancelled");
    assert_eq!(app.sheet.matrix().row_count(), 14);
}

#[test]
fn test_menu_refused_on_placeholder() {
    let mut app = app();
    focus(&mut app, 2, 0);
    app.open_menu();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.state.context_menu.is_none());
    assert!(!app.status_message.is_empty());
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn test_range_command() {
    let mut app = app();
    focus(&mut app, 5, 0);
    handle_command("range 2024-01 2024-06", &mut app).unwrap();
    assert_eq!(app.sheet.months().len(), 6);
    assert_eq!(app.state.focus, Position::new(0, 0));
    assert!(app.status_message.contains("6 months"));
}

#[test]
fn test_start_and_end_commands() {
    let mut app = app();
    handle_command("start 2023-12", &mut app).unwrap();
    assert_eq!(app.sheet.months().len(), 4);
    handle_command("end 2023-06", &mut app).unwrap();
    assert!(app.sheet.months().is_empty());
    assert_eq!(app.status_message, "No months between 2023-12 and 2023-06");
}

#[test]
fn test_bad_month_in_command() {
    let mut app = app();
    handle_command("start 2024-13", &mut app).unwrap();
    assert!(app.status_message.contains("Invalid month '2024-13'"));
    assert_eq!(app.sheet.months().len(), 3);

    handle_command("range 2024-01", &mut app).unwrap();
    assert!(app.status_message.starts_with("Usage: :range"));
}

#[test]
fn test_unknown_command_suggests() {
    let mut app = app();
    handle_command("rnage 2024-01 2024-02", &mut app).unwrap();
    assert_eq!(
        app.status_message,
        "Unknown command: :rnage. Did you mean :range?"
    );
}

#[test]
fn test_quit_and_help_commands() {
    let mut app = app();
    handle_command("help", &mut app).unwrap();
    assert!(app.show_help);
    handle_command("q", &mut app).unwrap();
    assert!(!app.running);
}

// ── Scrolling ─────────────────────────────────────────────────

#[test]
fn test_sync_scroll_follows_focus() {
    let mut app = app();
    app.visible_rows = 3;
    app.visible_months = 1;

    focus(&mut app, 13, 0);
    app.sync_scroll();
    // Last display row is the expense placeholder at index 19.
    assert_eq!(app.row_scroll, 17);

    focus(&mut app, 0, 2);
    app.sync_scroll();
    assert_eq!(app.row_scroll, 2);
    assert_eq!(app.month_scroll, 2);
}
