use rust_decimal::Decimal;

use super::error::{GridError, GridResult};
use super::months;
use super::nav::{NavCoord, NavKey, NavigationMatrix, Position};
use super::ops;
use super::totals::Totals;
use super::tree::CategoryTree;
use crate::models::{Category, CategoryId, Month};

/// Cell a context menu was opened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ContextTarget {
    pub(crate) category: CategoryId,
    pub(crate) month: usize,
}

/// UI-side state handed to every event and replaced by its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct UiState {
    pub(crate) focus: Position,
    pub(crate) context_menu: Option<ContextTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GridEvent {
    CellChanged {
        category: CategoryId,
        month: usize,
        value: Decimal,
    },
    LabelChanged {
        category: CategoryId,
        text: String,
    },
    Key(NavKey),
    ContextMenuRequested {
        category: CategoryId,
        month: usize,
    },
    ContextMenuDismissed,
    ApplyToAllConfirmed,
    DeleteConfirmed,
    DateRangeChanged {
        start: Month,
        end: Month,
    },
}

/// A budget sheet: the month range and the category tree laid against it.
///
/// Each event runs to completion (mutation, subtotals, matrix rebuild, focus)
/// before the next one is looked at.
#[derive(Debug, Clone)]
pub(crate) struct Sheet {
    start: Month,
    end: Month,
    months: Vec<Month>,
    tree: CategoryTree,
}

impl Sheet {
    pub(crate) fn new(start: Month, end: Month) -> Self {
        let months = months::generate(start, end);
        let tree = CategoryTree::seeded(months.len());
        Self {
            start,
            end,
            months,
            tree,
        }
    }

    pub(crate) fn range(&self) -> (Month, Month) {
        (self.start, self.end)
    }

    pub(crate) fn months(&self) -> &[Month] {
        &self.months
    }

    pub(crate) fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    #[cfg(test)]
    pub(crate) fn tree_mut(&mut self) -> &mut CategoryTree {
        &mut self.tree
    }

    /// Built fresh on every call.
    pub(crate) fn matrix(&self) -> NavigationMatrix {
        NavigationMatrix::build(&self.tree)
    }

    pub(crate) fn totals(&self) -> Totals {
        Totals::compute(&self.tree)
    }

    /// Coordinate under the focus, after clamping.
    pub(crate) fn focused(&self, state: UiState) -> Option<NavCoord> {
        let matrix = self.matrix();
        matrix.get(matrix.clamp(state.focus)).copied()
    }

    /// Apply one event. Rejected events leave the sheet as it was.
    pub(crate) fn handle(&mut self, state: UiState, event: GridEvent) -> UiState {
        let (next, outcome) = self.dispatch(state, event);
        if let Err(err) = outcome {
            tracing::debug!(error = %err, "event ignored");
        }
        next
    }

    /// Next state plus the reason the event was rejected, if it was.
    pub(crate) fn dispatch(&mut self, state: UiState, event: GridEvent) -> (UiState, GridResult<()>) {
        // A confirmed menu action closes the menu even when it is rejected.
        let fallback = match event {
            GridEvent::ApplyToAllConfirmed | GridEvent::DeleteConfirmed => UiState {
                context_menu: None,
                ..state
            },
            _ => state,
        };
        match self.try_handle(state, event) {
            Ok(next) => (next, Ok(())),
            Err(err) => (fallback, Err(err)),
        }
    }

    /// Like [`Sheet::handle`], but reports why an event was rejected.
    pub(crate) fn try_handle(&mut self, state: UiState, event: GridEvent) -> GridResult<UiState> {
        match event {
            GridEvent::CellChanged {
                category,
                month,
                value,
            } => {
                self.tree.write_cell(category, month, value)?;
                Ok(state)
            }
            GridEvent::LabelChanged { category, text } => {
                self.tree.edit_label(category, &text)?;
                Ok(state)
            }
            GridEvent::Key(NavKey::Enter) => self.enter(state),
            GridEvent::Key(key) => {
                let focus = self.matrix().resolve(state.focus, key);
                tracing::trace!(?key, row = focus.row, col = focus.col, "focus moved");
                Ok(UiState { focus, ..state })
            }
            GridEvent::ContextMenuRequested { category, month } => {
                let target = self.tree.find(category).ok_or(GridError::NotFound(category))?;
                if target.is_placeholder {
                    return Err(GridError::Placeholder(category));
                }
                Ok(UiState {
                    context_menu: Some(ContextTarget { category, month }),
                    ..state
                })
            }
            GridEvent::ContextMenuDismissed => Ok(UiState {
                context_menu: None,
                ..state
            }),
            GridEvent::ApplyToAllConfirmed => {
                let Some(target) = state.context_menu else {
                    return Ok(state);
                };
                ops::apply_to_all(&mut self.tree, target.category, target.month)?;
                Ok(UiState {
                    context_menu: None,
                    ..state
                })
            }
            GridEvent::DeleteConfirmed => {
                let Some(target) = state.context_menu else {
                    return Ok(state);
                };
                let before = self.matrix();
                let focused = before.get(before.clamp(state.focus)).copied();
                let removed = ops::delete_category(&mut self.tree, target.category)?;
                let focus = self.focus_after_delete(&before, focused, &removed, state.focus);
                Ok(UiState {
                    focus,
                    context_menu: None,
                })
            }
            GridEvent::DateRangeChanged { start, end } => {
                self.set_range(start, end);
                Ok(UiState::default())
            }
        }
    }

    /// Focus stays on the category it was on. If that category went with the
    /// deleted row, it moves to whatever now sits where the deleted row began.
    fn focus_after_delete(
        &self,
        before: &NavigationMatrix,
        focused: Option<NavCoord>,
        removed: &Category,
        fallback: Position,
    ) -> Position {
        let after = self.matrix();
        if let Some(pos) = focused.and_then(|c| after.locate(c.category, c.cell)) {
            return pos;
        }
        let gone: Vec<CategoryId> = std::iter::once(removed)
            .chain(removed.sub_categories.iter())
            .map(|c| c.id)
            .collect();
        let row = before
            .rows()
            .iter()
            .position(|row| row.iter().any(|c| gone.contains(&c.category)))
            .unwrap_or(fallback.row);
        after.clamp(Position::new(row, fallback.col))
    }

    /// Enter on a placeholder's label adds the category, then focus moves to
    /// the new row in the rebuilt matrix. Anywhere else it stays put.
    fn enter(&mut self, state: UiState) -> GridResult<UiState> {
        let Some(coord) = self.focused(state) else {
            return Ok(state);
        };
        let is_placeholder_label = coord.cell == 0
            && self
                .tree
                .find(coord.category)
                .is_some_and(|c| c.is_placeholder);
        if !is_placeholder_label {
            return Ok(state);
        }

        let owner = self
            .tree
            .owner_of(coord.category)
            .ok_or(GridError::NotFound(coord.category))?;
        let added = ops::add_category(&mut self.tree, coord.category, owner)?;

        let matrix = self.matrix();
        let focus = matrix
            .locate(added.category, 1)
            .or_else(|| self.first_placeholder_below(&matrix, added.category))
            .or_else(|| matrix.first_of(added.placeholder))
            .unwrap_or_else(|| matrix.clamp(state.focus));
        Ok(UiState {
            focus,
            context_menu: None,
        })
    }

    /// A new parent has no value cells; its own placeholder is the first
    /// thing worth focusing.
    fn first_placeholder_below(
        &self,
        matrix: &NavigationMatrix,
        category: CategoryId,
    ) -> Option<Position> {
        let parent = self.tree.find(category)?;
        let child = parent.sub_categories.iter().find(|c| c.is_placeholder)?;
        matrix.first_of(child.id)
    }

    pub(crate) fn set_range(&mut self, start: Month, end: Month) {
        self.start = start;
        self.end = end;
        self.months = months::generate(start, end);
        self.tree.resize(self.months.len());
        tracing::info!(start = %start, end = %end, months = self.months.len(), "date range changed");
    }
}
