use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::app::{App, InputMode};
use super::commands;
use super::theme;
use super::util::format_amount;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(5),    // Grid
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], app);
    super::screens::grid::render(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if app.input_mode == InputMode::Menu {
        render_context_menu(f, chunks[1], app);
    }
    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_title_bar(f: &mut Frame, area: Rect, app: &App) {
    let (start, end) = app.sheet.range();
    let months = app.sheet.months().len();
    let shown = app.visible_months.min(months);
    let window = if months > shown {
        format!(
            "  months {}-{} of {months}",
            app.month_scroll + 1,
            app.month_scroll + shown
        )
    } else {
        String::new()
    };

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(
            " budgrid ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" | ", Style::default().fg(theme::OVERLAY)),
        Span::styled(format!("{start} to {end}"), theme::normal_style()),
        Span::styled(window, theme::dim_style()),
    ]))
    .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(bar, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command | InputMode::Editing => theme::GREEN,
        InputMode::Menu => theme::YELLOW,
        InputMode::Confirm => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = match (app.focused(), app.focused_category()) {
        (Some(coord), Some(category)) => {
            let position = format!("{}/{}", coord.flat_index + 1, app.sheet.matrix().len());
            if coord.cell == 0 {
                format!(" {} | {position} ", category.name)
            } else {
                let month = app
                    .sheet
                    .months()
                    .get(coord.cell - 1)
                    .map(|m| m.short_label())
                    .unwrap_or_default();
                format!(" {} | {month} | {position} ", category.name)
            }
        }
        _ => String::from(" no editable cells "),
    };

    let right = match app.input_mode {
        InputMode::Normal if app.on_placeholder() => " type a name | Enter add | ? help ",
        InputMode::Normal => " Enter edit | m menu | :range | ? help ",
        InputMode::Editing => " Enter commit | Esc cancel ",
        InputMode::Menu => " a apply | d delete | D delete group | Esc close ",
        InputMode::Confirm => " y confirm | n cancel ",
        InputMode::Command => " Enter run | Esc cancel ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.chars().count() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Editing => (
            Line::from(vec![
                Span::styled("edit> ", Style::default().fg(theme::GREEN)),
                Span::styled(&app.edit_buffer, theme::command_bar_style()),
            ]),
            Some(6 + app.edit_buffer.chars().count() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal | InputMode::Menu => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, m for the row menu, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn render_context_menu(f: &mut Frame, area: Rect, app: &App) {
    let Some(target) = app.state.context_menu else {
        return;
    };
    let Some(category) = app.sheet.tree().find(target.category) else {
        return;
    };
    let month = app
        .sheet
        .months()
        .get(target.month)
        .map(|m| m.short_label())
        .unwrap_or_default();

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {} ", category.name),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if category.is_leaf() {
        lines.push(Line::from(Span::styled(
            format!(
                "  a  Apply {} ({month}) to all months",
                format_amount(category.month_value(target.month))
            ),
            theme::normal_style(),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("  d  Delete {}", category.name),
        theme::normal_style(),
    )));
    lines.push(Line::from(Span::styled(
        "  D  Delete the whole group",
        theme::normal_style(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Esc to close ", theme::dim_style())));

    let popup_height = (lines.len() as u16 + 2).min(area.height);
    let popup_width = 56.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let menu = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::YELLOW))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(menu, popup_area);
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let mut help_text = vec![
        Line::from(Span::styled(
            " budgrid Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Navigation"),
        Line::from(Span::styled(
            "  Arrows / hjkl    Move between cells    Ctrl-q     Quit",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  Tab/Shift-Tab    Next/Previous cell    ?          This help",
            theme::normal_style(),
        )),
        Line::from(""),
        section(" Editing"),
        Line::from(Span::styled(
            "  0-9 - .          Type a new amount     Enter      Edit / commit",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  Any key on + row Name a new category   Esc        Cancel edit",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  m                Row menu (apply to all months, delete)",
            theme::normal_style(),
        )),
        Line::from(""),
        section(" Commands"),
    ];

    // Build command list dynamically from COMMANDS registry
    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 1 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<15} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        Style::default().fg(theme::TEXT_DIM),
    )));

    // Center the popup, clamped to terminal height
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 72.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
