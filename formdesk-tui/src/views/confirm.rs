//! Delete confirmation dialog.

use crate::state::App;
use crate::views::helpers::centered_rect;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let listing = &app.active_screen().listing;
    let Some(label) = listing.confirm.label(app.active_profile()) else {
        return;
    };
    let dialog = centered_rect(50, 7, area);
    let lines = vec![
        Line::from(vec![
            Span::raw("Delete "),
            Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("?"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter/y to delete, Esc/n to keep",
            Style::default().fg(app.theme.text_dim),
        )),
    ];
    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title("Confirm delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.error)),
    );
    f.render_widget(Clear, dialog);
    f.render_widget(widget, dialog);
}
