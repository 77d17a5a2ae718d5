use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "budgrid.log";
const ENV_VAR: &str = "BUDGRID_LOG";
const DEFAULT_DIRECTIVE: &str = "budgrid=info";

static TRACING_INIT: Once = Once::new();

/// Send `tracing` output to `budgrid.log` under `dir`. Only the first call
/// installs a subscriber.
pub(crate) fn init(configured: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let env = std::env::var(ENV_VAR).ok();
    let directive = directive(env.as_deref(), configured);

    let mut installed = Ok(());
    TRACING_INIT.call_once(|| installed = install(&directive, file));
    installed?;
    Ok(path)
}

fn install(directive: &str, file: File) -> Result<()> {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}

/// `BUDGRID_LOG` wins over the settings file, which wins over the default.
fn directive(env: Option<&str>, configured: &str) -> String {
    [env.unwrap_or_default(), configured]
        .into_iter()
        .map(str::trim)
        .find(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DIRECTIVE)
        .to_string()
}
