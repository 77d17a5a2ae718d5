use crate::models::CategoryId;

/// Why an engine operation left the grid untouched.
///
/// None of these are fatal. The session layer logs them and carries on, the
/// TUI shows them in the status bar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum GridError {
    #[error("Category {0} no longer exists")]
    NotFound(CategoryId),

    #[error("Category {0} is a placeholder row")]
    Placeholder(CategoryId),

    #[error("Category {0} is not a placeholder row")]
    NotAPlaceholder(CategoryId),

    #[error("Income and expense groups cannot be deleted")]
    RootDeletion(CategoryId),

    #[error("Category {0} has no monthly values")]
    NotALeaf(CategoryId),

    #[error("Label of category {0} is not editable")]
    LabelLocked(CategoryId),

    #[error("Month {month} is outside the {months}-month range")]
    MonthOutOfRange { month: usize, months: usize },

    #[error("Type a name before adding a category")]
    BlankLabel,

    #[error("Amount too large, totals would overflow")]
    Overflow,

    #[error("Invariant violated: {0}")]
    Invariant(String),
}

pub(crate) type GridResult<T> = Result<T, GridError>;
