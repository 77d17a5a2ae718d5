use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::App;
use crate::models::Month;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit budgrid", cmd_quit, r);
    register_command!("quit", "Quit budgrid", cmd_quit, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "range",
        "Set month range (e.g. :range 2024-01 2024-12)",
        cmd_range,
        r
    );
    register_command!(
        "start",
        "Set first month (e.g. :start 2024-01)",
        cmd_start,
        r
    );
    register_command!("end", "Set last month (e.g. :end 2024-12)", cmd_end, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_range(args: &str, app: &mut App) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [start, end] = parts.as_slice() else {
        app.set_status("Usage: :range <YYYY-MM> <YYYY-MM>");
        return Ok(());
    };
    match (start.parse::<Month>(), end.parse::<Month>()) {
        (Ok(start), Ok(end)) => app.set_range(start, end),
        (Err(e), _) | (_, Err(e)) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_start(args: &str, app: &mut App) -> anyhow::Result<()> {
    match args.parse::<Month>() {
        Ok(start) => {
            let (_, end) = app.sheet.range();
            app.set_range(start, end);
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_end(args: &str, app: &mut App) -> anyhow::Result<()> {
    match args.parse::<Month>() {
        Ok(end) => {
            let (start, _) = app.sheet.range();
            app.set_range(start, end);
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}
