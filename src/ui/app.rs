use rust_decimal::Decimal;

use super::util::{format_amount, keep_visible, parse_amount};
use crate::grid::{GridEvent, NavCoord, NavKey, Sheet, UiState};
use crate::models::{Category, CategoryId, Level, Month};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Editing,
    Menu,
    Confirm,
    Command,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Editing => write!(f, "EDIT"),
            Self::Menu => write!(f, "MENU"),
            Self::Confirm => write!(f, "CONFIRM"),
            Self::Command => write!(f, "COMMAND"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    ApplyToAll { name: String, value: Decimal },
    Delete { name: String },
}

/// Where the edit buffer goes on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditTarget {
    Amount { category: CategoryId, month: usize },
    Label { category: CategoryId },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) sheet: Sheet,
    pub(crate) state: UiState,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) edit_buffer: String,
    pub(crate) edit_target: Option<EditTarget>,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
    pub(crate) visible_months: usize,
    pub(crate) row_scroll: usize,
    pub(crate) month_scroll: usize,
}

impl App {
    pub(crate) fn new(start: Month, end: Month) -> Self {
        Self {
            running: true,
            sheet: Sheet::new(start, end),
            state: UiState::default(),
            input_mode: InputMode::Normal,
            command_input: String::new(),
            edit_buffer: String::new(),
            edit_target: None,
            status_message: String::new(),
            show_help: false,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
            visible_months: 6,
            row_scroll: 0,
            month_scroll: 0,
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub(crate) fn focused(&self) -> Option<NavCoord> {
        self.sheet.focused(self.state)
    }

    pub(crate) fn focused_category(&self) -> Option<&Category> {
        self.focused()
            .and_then(|coord| self.sheet.tree().find(coord.category))
    }

    /// True when the focus sits on a placeholder's label cell.
    pub(crate) fn on_placeholder(&self) -> bool {
        self.focused().is_some_and(|coord| {
            coord.cell == 0
                && self
                    .sheet
                    .tree()
                    .find(coord.category)
                    .is_some_and(|c| c.is_placeholder)
        })
    }

    /// Run one grid event. A rejection is shown in the status bar.
    pub(crate) fn dispatch(&mut self, event: GridEvent) -> bool {
        let (next, outcome) = self.sheet.dispatch(self.state, event);
        self.state = next;
        match outcome {
            Ok(()) => true,
            Err(e) => {
                self.set_status(e.to_string());
                false
            }
        }
    }

    pub(crate) fn navigate(&mut self, key: NavKey) {
        self.dispatch(GridEvent::Key(key));
    }

    // ── Editing ──────────────────────────────────────────────

    /// Open the edit buffer on the focused cell. `first` is the keystroke
    /// that started the edit, if any; otherwise the current value is loaded.
    pub(crate) fn begin_edit(&mut self, first: Option<char>) {
        let Some(coord) = self.focused() else {
            return;
        };
        let Some(category) = self.sheet.tree().find(coord.category) else {
            return;
        };

        let (target, current) = if coord.cell == 0 {
            if !category.is_placeholder {
                return;
            }
            (
                EditTarget::Label {
                    category: category.id,
                },
                String::new(),
            )
        } else {
            let month = coord.cell - 1;
            let value = category.month_value(month);
            let current = if value.is_zero() {
                String::new()
            } else {
                value.normalize().to_string()
            };
            (
                EditTarget::Amount {
                    category: category.id,
                    month,
                },
                current,
            )
        };

        self.edit_buffer = match first {
            Some(c) => c.to_string(),
            None => current,
        };
        self.edit_target = Some(target);
        self.input_mode = InputMode::Editing;
    }

    /// Write the buffer back. Returns whether the grid accepted it.
    pub(crate) fn commit_edit(&mut self) -> bool {
        let buffer = std::mem::take(&mut self.edit_buffer);
        self.input_mode = InputMode::Normal;
        let Some(target) = self.edit_target.take() else {
            return false;
        };

        match target {
            EditTarget::Amount { category, month } => {
                let Some(value) = parse_amount(&buffer) else {
                    self.set_status(format!("Invalid amount: '{}'", buffer.trim()));
                    return false;
                };
                let accepted = self.dispatch(GridEvent::CellChanged {
                    category,
                    month,
                    value,
                });
                if accepted {
                    self.status_message.clear();
                }
                accepted
            }
            EditTarget::Label { category } => {
                let name = buffer.trim().to_string();
                if !self.dispatch(GridEvent::LabelChanged {
                    category,
                    text: name.clone(),
                }) {
                    return false;
                }
                if self.dispatch(GridEvent::Key(NavKey::Enter)) {
                    self.set_status(format!("Added: {name}"));
                    true
                } else {
                    self.reset_placeholder(category);
                    false
                }
            }
        }
    }

    pub(crate) fn cancel_edit(&mut self) {
        self.edit_buffer.clear();
        self.edit_target = None;
        self.input_mode = InputMode::Normal;
        self.set_status("Edit cancelled");
    }

    /// Put the prompt back after a rejected add.
    fn reset_placeholder(&mut self, category: CategoryId) {
        let prompt = self.sheet.tree().find(category).map(|c| c.name.clone());
        if let Some(prompt) = prompt {
            self.sheet.handle(
                self.state,
                GridEvent::LabelChanged {
                    category,
                    text: prompt,
                },
            );
        }
    }

    // ── Context menu ─────────────────────────────────────────

    pub(crate) fn open_menu(&mut self) {
        let Some(coord) = self.focused() else {
            return;
        };
        let month = coord.cell.saturating_sub(1);
        if self.dispatch(GridEvent::ContextMenuRequested {
            category: coord.category,
            month,
        }) {
            self.input_mode = InputMode::Menu;
        }
    }

    pub(crate) fn close_menu(&mut self) {
        self.dispatch(GridEvent::ContextMenuDismissed);
        self.input_mode = InputMode::Normal;
    }

    pub(crate) fn request_apply_to_all(&mut self) {
        let Some(target) = self.state.context_menu else {
            self.input_mode = InputMode::Normal;
            return;
        };
        let Some(category) = self.sheet.tree().find(target.category) else {
            self.close_menu();
            return;
        };
        let name = category.name.clone();
        let value = category.month_value(target.month);
        let month = self
            .sheet
            .months()
            .get(target.month)
            .map(Month::short_label)
            .unwrap_or_default();

        self.confirm_message = format!(
            "Copy {} from {month} into every month of {name}?",
            format_amount(value)
        );
        self.pending_action = Some(PendingAction::ApplyToAll { name, value });
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn request_delete(&mut self) {
        let Some(target) = self.state.context_menu else {
            self.input_mode = InputMode::Normal;
            return;
        };
        let Some(category) = self.sheet.tree().find(target.category) else {
            self.close_menu();
            return;
        };
        let name = category.name.clone();
        self.confirm_message = format!("Delete {name}?");
        self.pending_action = Some(PendingAction::Delete { name });
        self.input_mode = InputMode::Confirm;
    }

    /// Retarget the open menu at the parent group owning the row, then ask
    /// to delete the whole group.
    pub(crate) fn request_delete_group(&mut self) {
        let Some(target) = self.state.context_menu else {
            self.input_mode = InputMode::Normal;
            return;
        };
        let tree = self.sheet.tree();
        let group = tree
            .owner_of(target.category)
            .and_then(|id| tree.find(id))
            .filter(|c| c.level == Level::Parent)
            .map(|c| (c.id, c.name.clone(), c.real_children().count()));
        let Some((group, name, leaves)) = group else {
            self.set_status("Row has no group to delete");
            return;
        };

        if !self.dispatch(GridEvent::ContextMenuRequested {
            category: group,
            month: target.month,
        }) {
            return;
        }
        self.confirm_message = format!("Delete {name} and its {leaves} categories?");
        self.pending_action = Some(PendingAction::Delete { name });
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn confirm(&mut self) {
        if let Some(action) = self.pending_action.take() {
            match action {
                PendingAction::ApplyToAll { name, value } => {
                    if self.dispatch(GridEvent::ApplyToAllConfirmed) {
                        self.set_status(format!(
                            "Applied {} to every month of {name}",
                            format_amount(value)
                        ));
                    }
                }
                PendingAction::Delete { name } => {
                    if self.dispatch(GridEvent::DeleteConfirmed) {
                        self.set_status(format!("Deleted: {name}"));
                    }
                }
            }
        }
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
    }

    pub(crate) fn cancel_confirm(&mut self) {
        self.pending_action = None;
        self.confirm_message.clear();
        self.close_menu();
        self.set_status("Cancelled");
    }

    // ── Range ────────────────────────────────────────────────

    pub(crate) fn set_range(&mut self, start: Month, end: Month) {
        self.dispatch(GridEvent::DateRangeChanged { start, end });
        self.row_scroll = 0;
        self.month_scroll = 0;
        let count = self.sheet.months().len();
        if count == 0 {
            self.set_status(format!("No months between {start} and {end}"));
        } else {
            self.set_status(format!(
                "Showing {} to {} ({count} months, values cleared)",
                start.short_label(),
                end.short_label()
            ));
        }
    }

    // ── Layout ───────────────────────────────────────────────

    /// Display row of a category (roots, parents and leaves in walk order).
    pub(crate) fn display_row(&self, category: CategoryId) -> Option<usize> {
        self.sheet
            .tree()
            .walk()
            .iter()
            .position(|c| c.id == category)
    }

    /// Scroll both axes so the focused cell is on screen.
    pub(crate) fn sync_scroll(&mut self) {
        let Some(coord) = self.focused() else {
            return;
        };
        if let Some(row) = self.display_row(coord.category) {
            keep_visible(row, &mut self.row_scroll, self.visible_rows);
        }
        if coord.cell > 0 {
            keep_visible(coord.cell - 1, &mut self.month_scroll, self.visible_months);
        }
        let months = self.sheet.months().len();
        self.month_scroll = self
            .month_scroll
            .min(months.saturating_sub(self.visible_months.max(1)));
    }
}
