//! Date × borough table for the incident dashboard.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per
//! `(date, borough)` pair and a scroll cursor.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use dashboard_core::formatting::format_count;
use dashboard_data::views::DateBoroughCount;

use crate::themes::Theme;

/// Render the date × borough table into `area`.
///
/// `state` carries the scroll cursor; its selection is clamped to the rows
/// present.
pub fn render_date_borough_table(
    frame: &mut Frame,
    area: Rect,
    rows: &[DateBoroughCount],
    state: &mut TableState,
    theme: &Theme,
) {
    if rows.is_empty() {
        render_no_data(frame, area, theme);
        return;
    }
    clamp_selection(state, rows.len());

    let header = Row::new(
        ["Date", "Borough", "Incidents"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(row.date.format("%Y-%m-%d").to_string()),
                Cell::from(row.boro.clone()),
                Cell::from(Line::from(format_count(row.incidents)).right_aligned()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(10),
    ];

    let table = Table::new(data_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(format!(
                    " Incidents by date and borough ({} rows) ",
                    format_count(rows.len() as u64)
                )),
        )
        .row_highlight_style(theme.table_selected)
        .style(theme.text);

    frame.render_stateful_widget(table, area, state);
}

/// Placeholder shown when the table has no rows.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No incidents to tabulate", theme.warning)),
        Line::from(""),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Incidents by date and borough "),
        ),
        area,
    );
}

/// Keep the cursor on an existing row, selecting the first row by default.
fn clamp_selection(state: &mut TableState, len: usize) {
    let selected = state.selected().unwrap_or(0).min(len.saturating_sub(1));
    state.select(Some(selected));
}

// ── Tests ──────────────────────────────────────────────────────────────────────
