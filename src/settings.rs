use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::models::Month;

const SETTINGS_FILE: &str = "settings.json";

/// User configuration, read once at startup.
///
/// Every field falls back to its default on its own, so a file with only
/// `log_level` in it is still valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// First month shown, `YYYY-MM`.
    pub(crate) start: String,
    /// Last month shown, `YYYY-MM`.
    pub(crate) end: String,
    /// `tracing` filter directive. Empty means the built-in default.
    pub(crate) log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        let (start, end) = default_range();
        Self {
            start: start.key(),
            end: end.key(),
            log_level: String::new(),
        }
    }
}

/// January through December of the current year.
fn default_range() -> (Month, Month) {
    let year = Month::current().year;
    (Month { year, month: 1 }, Month { year, month: 12 })
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "budgrid", "budgrid")
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))
}

pub(crate) fn settings_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(SETTINGS_FILE))
}

/// Data directory (log file lives here), created on first use.
pub(crate) fn data_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    let dir = dirs.data_dir();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

impl Settings {
    /// Settings from the standard location. A missing file gives defaults.
    pub(crate) fn load() -> Result<Self> {
        Self::load_from(&settings_path()?)
    }

    /// A missing file is not an error. An unreadable or malformed one is,
    /// and the caller falls back to defaults after reporting it.
    pub(crate) fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub(crate) fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, format!("{json}\n"))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Configured start and end month. Each one that fails to parse is
    /// replaced by its default.
    pub(crate) fn month_range(&self) -> (Month, Month) {
        let (default_start, default_end) = default_range();
        let parse = |raw: &str, fallback: Month| {
            raw.parse::<Month>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, fallback = %fallback, "bad month in settings");
                fallback
            })
        };
        (
            parse(&self.start, default_start),
            parse(&self.end, default_end),
        )
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
