use super::tree::CategoryTree;
use crate::models::{Category, CategoryId};

/// Row/column in the navigation matrix (not in the rendered table).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Position {
    pub(crate) row: usize,
    pub(crate) col: usize,
}

impl Position {
    pub(crate) fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// One focusable cell.
///
/// `flat_index` is the cell's place in the overall focus order; `category`
/// and `cell` say which cell of which row it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NavCoord {
    pub(crate) flat_index: usize,
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) category: CategoryId,
    pub(crate) cell: usize,
}

impl NavCoord {
    pub(crate) fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Enter,
}

/// Every focusable cell of the tree, row by row in display order.
///
/// Derived from a tree snapshot and never patched: rebuild it after any
/// structural change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct NavigationMatrix {
    rows: Vec<Vec<NavCoord>>,
}

impl NavigationMatrix {
    pub(crate) fn build(tree: &CategoryTree) -> Self {
        let max_cols = tree.months_count() + 1;
        let mut rows = Vec::new();
        let mut flat_index = 0;

        for root in tree.roots() {
            for parent in &root.sub_categories {
                push_row(&mut rows, parent, max_cols, &mut flat_index);
                for leaf in &parent.sub_categories {
                    push_row(&mut rows, leaf, max_cols, &mut flat_index);
                }
            }
        }

        Self { rows }
    }

    pub(crate) fn rows(&self) -> &[Vec<NavCoord>] {
        &self.rows
    }

    #[cfg(test)]
    pub(crate) fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of focusable cells.
    pub(crate) fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn get(&self, pos: Position) -> Option<&NavCoord> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.col))
    }

    #[cfg(test)]
    pub(crate) fn by_flat_index(&self, flat_index: usize) -> Option<&NavCoord> {
        self.rows.iter().flatten().find(|c| c.flat_index == flat_index)
    }

    /// Where cell `cell` of `category` sits, if it is focusable.
    pub(crate) fn locate(&self, category: CategoryId, cell: usize) -> Option<Position> {
        self.rows
            .iter()
            .flatten()
            .find(|c| c.category == category && c.cell == cell)
            .map(NavCoord::position)
    }

    /// First focusable cell of `category`.
    pub(crate) fn first_of(&self, category: CategoryId) -> Option<Position> {
        self.rows
            .iter()
            .flatten()
            .find(|c| c.category == category)
            .map(NavCoord::position)
    }

    /// Pull an arbitrary position back into bounds.
    pub(crate) fn clamp(&self, pos: Position) -> Position {
        let Some(last_row) = self.rows.len().checked_sub(1) else {
            return Position::default();
        };
        let row = pos.row.min(last_row);
        Position::new(row, pos.col.min(self.last_col(row)))
    }

    fn last_col(&self, row: usize) -> usize {
        self.rows
            .get(row)
            .map_or(0, |r| r.len().saturating_sub(1))
    }

    /// Target of a directional key pressed at `from`. Never fails: targets
    /// outside the matrix are clamped, and keys with nowhere to go leave the
    /// position where it is.
    pub(crate) fn resolve(&self, from: Position, key: NavKey) -> Position {
        if self.is_empty() {
            return Position::default();
        }
        let pos = self.clamp(from);
        let last_row = self.rows.len() - 1;

        match key {
            NavKey::Right | NavKey::Tab => {
                if pos.col < self.last_col(pos.row) {
                    Position::new(pos.row, pos.col + 1)
                } else if pos.row < last_row {
                    Position::new(pos.row + 1, 0)
                } else {
                    pos
                }
            }
            NavKey::Left | NavKey::BackTab => {
                if pos.col > 0 {
                    Position::new(pos.row, pos.col - 1)
                } else if pos.row > 0 {
                    Position::new(pos.row - 1, self.last_col(pos.row - 1))
                } else {
                    // Left from the very first cell wraps to the end.
                    Position::new(last_row, self.last_col(last_row))
                }
            }
            NavKey::Down => self.clamp(Position::new(pos.row + 1, pos.col)),
            NavKey::Up => self.clamp(Position::new(pos.row.saturating_sub(1), pos.col)),
            NavKey::Enter => pos,
        }
    }
}

fn push_row(
    rows: &mut Vec<Vec<NavCoord>>,
    category: &Category,
    max_cols: usize,
    flat_index: &mut usize,
) {
    let row = rows.len();
    let coords: Vec<NavCoord> = category
        .cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.focusable)
        .take(max_cols)
        .enumerate()
        .map(|(col, (cell, _))| {
            let coord = NavCoord {
                flat_index: *flat_index,
                row,
                col,
                category: category.id,
                cell,
            };
            *flat_index += 1;
            coord
        })
        .collect();

    if !coords.is_empty() {
        rows.push(coords);
    }
}
