mod error;
pub(crate) mod months;
mod nav;
pub(crate) mod ops;
mod session;
mod subtotal;
mod totals;
mod tree;

pub(crate) use nav::{NavCoord, NavKey};
pub(crate) use session::{GridEvent, Sheet, UiState};
pub(crate) use totals::Totals;

#[cfg(test)]
pub(crate) use self::{
    error::GridError,
    nav::{NavigationMatrix, Position},
    session::ContextTarget,
    tree::CategoryTree,
};

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tree_tests;
