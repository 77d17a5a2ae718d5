mod grid;
mod logging;
mod models;
mod run;
mod settings;
mod ui;

use anyhow::Result;

use settings::Settings;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let loaded = Settings::load();
    let settings = loaded.as_ref().cloned().unwrap_or_default();

    // The grid still works without a log file.
    if let Err(e) = settings::data_dir().and_then(|dir| logging::init(&settings.log_level, &dir)) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    if let Err(e) = &loaded {
        tracing::warn!(error = %format!("{e:#}"), "using default settings");
        eprintln!("Warning: using default settings: {e:#}");
    }

    match args.get(1).map(String::as_str) {
        None => {
            let (start, end) = settings.month_range();
            run::as_tui(start, end)
        }
        Some("--start" | "--end") => {
            let (start, end) = run::range_from_args(&args[1..], settings.month_range())?;
            run::as_tui(start, end)
        }
        Some(_) => run::as_cli(&args, &settings),
    }
}
