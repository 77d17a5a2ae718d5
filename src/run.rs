mod cli;
mod tui;

pub(crate) use cli::{as_cli, range_from_args};
pub(crate) use tui::as_tui;
