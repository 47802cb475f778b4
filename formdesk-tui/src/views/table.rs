//! The entity table: loading row, empty-state row or the visible page.

use crate::state::App;
use crate::theme::status_color;
use crate::views::helpers::cell_text;
use formdesk_core::TableBody;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let profile = app.active_profile();
    let listing = &app.active_screen().listing;
    let view = listing.view(&app.directory);

    let widths: Vec<Constraint> = profile
        .columns
        .iter()
        .map(|c| Constraint::Percentage(c.width))
        .collect();

    let header = Row::new(profile.columns.iter().map(|c| Cell::from(c.header))).style(
        Style::default()
            .fg(app.theme.primary)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = match view.body {
        TableBody::Loading => vec![placeholder_row("Loading...", app.theme.text_dim)],
        TableBody::Empty => {
            let message = if listing.filter().is_active() {
                "No records match the current filters"
            } else {
                "No records found"
            };
            vec![placeholder_row(message, app.theme.text_muted)]
        }
        TableBody::Rows => view
            .rows
            .iter()
            .map(|record| {
                let cells = profile.columns.iter().map(|column| {
                    let text = cell_text(profile, column, record, &app.directory);
                    let style = if column.field == "status" {
                        Style::default().fg(status_color(&text, &app.theme))
                    } else {
                        Style::default().fg(app.theme.text)
                    };
                    Cell::from(text).style(style)
                });
                Row::new(cells)
            })
            .collect(),
    };

    let mut state = TableState::default();
    if view.body == TableBody::Rows {
        state.select(listing.selected_index());
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(profile.title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        )
        .highlight_style(
            Style::default()
                .bg(app.theme.bg_highlight)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(table, area, &mut state);
}

fn placeholder_row(message: &'static str, color: ratatui::style::Color) -> Row<'static> {
    Row::new(vec![Cell::from(message)]).style(Style::default().fg(color))
}
