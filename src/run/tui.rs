use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::grid::NavKey;
use crate::models::Month;
use crate::ui::app::{App, InputMode};
use crate::ui::commands;
use crate::ui::screens::grid::{AMOUNT_WIDTH, RESERVED_HEIGHT, RESERVED_WIDTH};
use crate::ui::util::columns_that_fit;

pub(crate) fn as_tui(start: Month, end: Month) -> Result<()> {
    let mut app = App::new(start, end);
    tracing::info!(start = %start, end = %end, "starting tui");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "tui exited with an error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // Title, status and command bars take 3 rows.
            let grid_height = f.area().height.saturating_sub(3 + RESERVED_HEIGHT);
            app.visible_rows = (grid_height as usize).max(1);
            app.visible_months = columns_that_fit(f.area().width, RESERVED_WIDTH, AMOUNT_WIDTH);
            app.sync_scroll();
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != event::KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app),
                InputMode::Editing => handle_editing_input(key, app),
                InputMode::Menu => handle_menu_input(key, app),
                InputMode::Confirm => handle_confirm_input(key, app),
                InputMode::Command => handle_command_input(key, app)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App) {
    if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
        && key.modifiers.contains(KeyModifiers::CONTROL)
    {
        app.running = false;
        return;
    }

    // On a "+ Add new ..." row every printable key goes into the new name.
    if app.on_placeholder() {
        if let KeyCode::Char(c) = key.code {
            if c != ':' {
                app.begin_edit(Some(c));
                return;
            }
        }
    }

    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char(c @ ('0'..='9' | '-' | '.')) => app.begin_edit(Some(c)),
        KeyCode::Char('m') => app.open_menu(),
        KeyCode::Up | KeyCode::Char('k') => app.navigate(NavKey::Up),
        KeyCode::Down | KeyCode::Char('j') => app.navigate(NavKey::Down),
        KeyCode::Left | KeyCode::Char('h') => app.navigate(NavKey::Left),
        KeyCode::Right | KeyCode::Char('l') => app.navigate(NavKey::Right),
        KeyCode::Tab => app.navigate(NavKey::Tab),
        KeyCode::BackTab => app.navigate(NavKey::BackTab),
        KeyCode::Enter => app.begin_edit(None),
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            app.commit_edit();
        }
        KeyCode::Tab => {
            if app.commit_edit() {
                app.navigate(NavKey::Tab);
            }
        }
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Backspace => {
            app.edit_buffer.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.edit_buffer.clear();
        }
        KeyCode::Char(c) => app.edit_buffer.push(c),
        _ => {}
    }
}

fn handle_menu_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('a') => app.request_apply_to_all(),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('D') => app.request_delete_group(),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('m') => app.close_menu(),
        _ => {}
    }
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_confirm(),
        _ => {}
    }
}

fn handle_command_input(key: event::KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}
