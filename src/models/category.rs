use rust_decimal::Decimal;

use super::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct CategoryId(pub(crate) u64);

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Depth in the three-level tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    Root,
    Parent,
    Leaf,
}

impl Level {
    /// Level of the entries in this level's child list.
    pub(crate) fn child(&self) -> Option<Level> {
        match self {
            Self::Root => Some(Self::Parent),
            Self::Parent => Some(Self::Leaf),
            Self::Leaf => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Category {
    pub(crate) id: CategoryId,
    pub(crate) name: String,
    pub(crate) kind: CategoryKind,
    pub(crate) level: Level,
    pub(crate) is_placeholder: bool,
    pub(crate) cells: Vec<Cell>,
    pub(crate) sub_categories: Vec<Category>,
    /// One slot per month plus a trailing aggregate slot.
    pub(crate) subtotals: Vec<Decimal>,
}

impl Category {
    pub(crate) fn is_parent(&self) -> bool {
        self.level != Level::Leaf
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.level == Level::Leaf
    }

    /// Real (non-placeholder) children.
    pub(crate) fn real_children(&self) -> impl Iterator<Item = &Category> {
        self.sub_categories.iter().filter(|c| !c.is_placeholder)
    }

    /// Text shown in the label column. Placeholders show whatever has been
    /// typed into their label cell.
    pub(crate) fn display_label(&self) -> &str {
        self.cells
            .first()
            .and_then(Cell::label_text)
            .unwrap_or(&self.name)
    }

    /// Amount in month column `month`, or zero when absent.
    pub(crate) fn month_value(&self, month: usize) -> Decimal {
        self.cells
            .get(month + 1)
            .map(Cell::amount_or_zero)
            .unwrap_or(Decimal::ZERO)
    }

    /// Per-month amounts of a leaf, label excluded.
    #[cfg(test)]
    pub(crate) fn month_values(&self) -> Vec<Decimal> {
        self.cells.iter().skip(1).map(Cell::amount_or_zero).collect()
    }

    pub(crate) fn months_count(&self) -> usize {
        self.subtotals.len().saturating_sub(1)
    }

    pub(crate) fn aggregate(&self) -> Decimal {
        self.subtotals.last().copied().unwrap_or(Decimal::ZERO)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
