use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell as TableCell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::grid::{NavCoord, Totals};
use crate::models::{Category, Level};
use crate::ui::app::{App, InputMode};
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) const LABEL_WIDTH: u16 = 30;
pub(crate) const AMOUNT_WIDTH: u16 = 14;
/// Borders plus the trailing Total column.
pub(crate) const RESERVED_WIDTH: u16 = LABEL_WIDTH + AMOUNT_WIDTH + 2;
/// Header row, totals block and borders.
pub(crate) const RESERVED_HEIGHT: u16 = 3 + TOTALS_HEIGHT;
const TOTALS_HEIGHT: u16 = 5;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let months = app.sheet.months();
    if months.is_empty() {
        render_empty(f, area, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(TOTALS_HEIGHT)])
        .split(area);

    let window = month_window(app);
    render_categories(f, chunks[0], app, window.clone());
    render_totals(f, chunks[1], &app.sheet.totals(), window);
}

/// Month indices currently on screen.
fn month_window(app: &App) -> std::ops::Range<usize> {
    let months = app.sheet.months().len();
    let start = app.month_scroll.min(months);
    start..(start + app.visible_months.max(1)).min(months)
}

fn widths(window: &std::ops::Range<usize>) -> Vec<Constraint> {
    std::iter::once(Constraint::Length(LABEL_WIDTH))
        .chain(window.clone().map(|_| Constraint::Length(AMOUNT_WIDTH)))
        .chain(std::iter::once(Constraint::Length(AMOUNT_WIDTH)))
        .collect()
}

fn header_row(app: &App, window: std::ops::Range<usize>) -> Row<'static> {
    let months = app.sheet.months();
    let mut cells = vec![TableCell::from("Category")];
    cells.extend(
        window
            .filter_map(|i| months.get(i))
            .map(|m| TableCell::from(right(m.short_label()))),
    );
    cells.push(TableCell::from(right("Total".to_string())));
    Row::new(cells).style(theme::header_style())
}

fn render_categories(f: &mut Frame, area: Rect, app: &App, window: std::ops::Range<usize>) {
    let focus = app.focused();
    let rows: Vec<Row> = app
        .sheet
        .tree()
        .walk()
        .into_iter()
        .enumerate()
        .skip(app.row_scroll)
        .take(app.visible_rows.max(1))
        .map(|(i, category)| category_row(app, category, focus, window.clone(), i))
        .collect();

    let (start, end) = app.sheet.range();
    let table = Table::new(rows, widths(&window))
        .header(header_row(app, window))
        .column_spacing(0)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(Span::styled(
                    format!(" Budget {} to {} ", start.short_label(), end.short_label()),
                    Style::default()
                        .fg(theme::TEXT_DIM)
                        .add_modifier(Modifier::BOLD),
                )),
        );
    f.render_widget(table, area);
}

fn category_row<'a>(
    app: &App,
    category: &Category,
    focus: Option<NavCoord>,
    window: std::ops::Range<usize>,
    index: usize,
) -> Row<'a> {
    let focused_cell = focus
        .filter(|c| c.category == category.id)
        .map(|c| c.cell);
    let editing = app.input_mode == InputMode::Editing;

    let base = if category.is_placeholder {
        theme::placeholder_style()
    } else {
        match category.level {
            Level::Root => theme::root_style(category.kind),
            Level::Parent => theme::parent_style(),
            Level::Leaf if index % 2 == 0 => theme::alt_row_style(),
            Level::Leaf => theme::normal_style(),
        }
    };

    let indent = match category.level {
        Level::Root => "",
        Level::Parent => "  ",
        Level::Leaf => "    ",
    };
    let label = if focused_cell == Some(0) && editing {
        format!("{indent}{}▏", app.edit_buffer)
    } else if category.is_placeholder {
        format!("{indent}+ {}", category.display_label())
    } else {
        format!("{indent}{}", category.name)
    };
    let label_width = LABEL_WIDTH.saturating_sub(1) as usize;
    let mut cells = vec![TableCell::from(truncate(&label, label_width))
        .style(cell_style(base, focused_cell == Some(0), editing))];

    for month in window {
        let text = if category.is_placeholder {
            String::new()
        } else if focused_cell == Some(month + 1) && editing {
            format!("{}▏", app.edit_buffer)
        } else if category.is_leaf() {
            format_amount(category.month_value(month))
        } else {
            format_amount(category.subtotals.get(month).copied().unwrap_or(Decimal::ZERO))
        };
        let style = cell_style(base, focused_cell == Some(month + 1), editing);
        cells.push(TableCell::from(right(text)).style(style));
    }

    let total = if category.is_placeholder {
        String::new()
    } else {
        format_amount(category.aggregate())
    };
    cells.push(TableCell::from(right(total)).style(base.add_modifier(Modifier::BOLD)));
    Row::new(cells)
}

fn cell_style(base: Style, focused: bool, editing: bool) -> Style {
    match (focused, editing) {
        (true, true) => theme::editing_style(),
        (true, false) => theme::selected_style(),
        (false, _) => base,
    }
}

fn render_totals(f: &mut Frame, area: Rect, totals: &Totals, window: std::ops::Range<usize>) {
    let lines: [(&str, &[Decimal], Decimal); 3] = [
        ("Profit / Loss", &totals.profit_loss, totals.net()),
        (
            "Opening Balance",
            &totals.opening_balance,
            totals.opening_balance.first().copied().unwrap_or_default(),
        ),
        (
            "Closing Balance",
            &totals.closing_balance,
            totals.closing_balance.last().copied().unwrap_or_default(),
        ),
    ];

    let rows: Vec<Row> = lines
        .into_iter()
        .map(|(label, values, summary)| {
            let mut cells = vec![TableCell::from(label).style(theme::header_style())];
            cells.extend(window.clone().map(|i| {
                let v = values.get(i).copied().unwrap_or_default();
                TableCell::from(right(format_amount(v)))
                    .style(theme::signed_style(v >= Decimal::ZERO))
            }));
            cells.push(
                TableCell::from(right(format_amount(summary))).style(
                    theme::signed_style(summary >= Decimal::ZERO).add_modifier(Modifier::BOLD),
                ),
            );
            Row::new(cells)
        })
        .collect();

    let table = Table::new(rows, widths(&window)).column_spacing(0).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY)),
    );
    f.render_widget(table, area);
}

fn right(text: String) -> Line<'static> {
    Line::from(format!("{text} ")).alignment(Alignment::Right)
}

fn render_empty(f: &mut Frame, area: Rect, app: &App) {
    let (start, end) = app.sheet.range();
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("No months between {start} and {end}"),
            theme::dim_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Use :range <start> <end> to pick a range (e.g. :range 2024-01 2024-12)",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Budget ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(msg, area);
}
