use anyhow::{Context, Result};

use crate::grid::{months, Sheet};
use crate::models::Month;
use crate::settings::{self, Settings};
use crate::ui::util::format_amount;

pub(crate) fn as_cli(args: &[String], settings: &Settings) -> Result<()> {
    match args[1].as_str() {
        "months" | "m" => cli_months(&args[2..]),
        "summary" | "s" => cli_summary(&args[2..], settings),
        "init-config" => cli_init_config(),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budgrid {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("budgrid - monthly budget spreadsheet for the terminal");
    println!();
    println!("Usage: budgrid [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive grid");
    println!("    --start <YYYY-MM>           First month (default: from settings)");
    println!("    --end <YYYY-MM>             Last month (default: from settings)");
    println!("  months <start> <end>          List the months in a range");
    println!("  summary                       Print group subtotals and balances");
    println!("    --start <YYYY-MM>           First month");
    println!("    --end <YYYY-MM>             Last month");
    println!("  init-config                   Write a default settings file");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

/// Apply `--start` / `--end` flags on top of `defaults`.
pub(crate) fn range_from_args(args: &[String], defaults: (Month, Month)) -> Result<(Month, Month)> {
    let flag = |name: &str| -> Result<Option<Month>> {
        args.windows(2)
            .find(|w| w[0] == name)
            .map(|w| w[1].parse::<Month>())
            .transpose()
            .with_context(|| format!("Bad value for {name}"))
    };
    if let Some(last) = args.last() {
        if last == "--start" || last == "--end" {
            anyhow::bail!("Missing value for {last}");
        }
    }
    let start = flag("--start")?.unwrap_or(defaults.0);
    let end = flag("--end")?.unwrap_or(defaults.1);
    Ok((start, end))
}

fn cli_months(args: &[String]) -> Result<()> {
    let [start, end] = args else {
        anyhow::bail!("Usage: budgrid months <YYYY-MM> <YYYY-MM>");
    };
    let start: Month = start.parse()?;
    let end: Month = end.parse()?;

    let months = months::generate(start, end);
    if months.is_empty() {
        println!("No months: {end} is before {start}");
        return Ok(());
    }
    for month in &months {
        println!("{}  {}", month.key(), month.short_label());
    }
    println!();
    println!("{} months", months.len());
    Ok(())
}

fn cli_summary(args: &[String], settings: &Settings) -> Result<()> {
    let (start, end) = range_from_args(args, settings.month_range())?;
    let sheet = Sheet::new(start, end);
    let totals = sheet.totals();

    println!("Budget {} to {}", start.short_label(), end.short_label());
    println!("{}", "─".repeat(72));
    if sheet.months().is_empty() {
        println!("  No months in range");
        return Ok(());
    }

    for root in sheet.tree().roots() {
        println!("  {:<30} {:>16}", root.name, format_amount(root.aggregate()));
        for parent in root.real_children() {
            println!(
                "    {:<28} {:>16}",
                parent.name,
                format_amount(parent.aggregate())
            );
        }
    }
    println!("{}", "─".repeat(72));

    println!(
        "  {:<10} {:>16} {:>16} {:>16}",
        "Month", "Profit/Loss", "Opening", "Closing"
    );
    for (i, month) in sheet.months().iter().enumerate() {
        let cell = |values: &[rust_decimal::Decimal]| {
            values.get(i).copied().map(format_amount).unwrap_or_default()
        };
        println!(
            "  {:<10} {:>16} {:>16} {:>16}",
            month.short_label(),
            cell(&totals.profit_loss),
            cell(&totals.opening_balance),
            cell(&totals.closing_balance),
        );
    }
    println!("{}", "─".repeat(72));
    println!("  {:<10} {:>16}", "Net", format_amount(totals.net()));
    Ok(())
}

fn cli_init_config() -> Result<()> {
    let path = settings::settings_path()?;
    if path.exists() {
        println!("Settings already exist at {}", path.display());
        return Ok(());
    }
    Settings::default().save_to(&path)?;
    tracing::info!(path = %path.display(), "wrote default settings");
    println!("Wrote default settings to {}", path.display());
    Ok(())
}
