mod category;
mod cell;
mod month;

pub(crate) use category::{Category, CategoryId, CategoryKind, Level};
pub(crate) use cell::{Cell, CellValue};
pub(crate) use month::Month;

#[cfg(test)]
mod tests;
