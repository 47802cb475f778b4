//! Create / edit form modal.

use crate::state::App;
use crate::views::helpers::centered_rect;
use formdesk_core::{ChoiceSource, FieldKind, FieldSpec, FormMode};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let form = &app.active_screen().listing.form;
    let Some(mode) = form.mode() else {
        return;
    };
    let title = match mode {
        FormMode::Create => format!("New {}", app.active_profile().title),
        FormMode::Edit(id) => format!("Edit {} #{}", app.active_profile().title, id),
    };
    let focused = form.focused().map(|field| field.name);

    let lines: Vec<Line> = form
        .fields()
        .iter()
        .map(|field| {
            let value = form.value(field.name).unwrap_or_default();
            let is_focused = focused == Some(field.name);
            field_line(app, field, value, is_focused)
        })
        .collect();

    let height = lines.len() as u16 + 2;
    let dialog = centered_rect(60, height, area);
    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focus)),
    );
    f.render_widget(Clear, dialog);
    f.render_widget(widget, dialog);
}

fn field_line<'a>(app: &App, field: &FieldSpec, value: &str, focused: bool) -> Line<'a> {
    let marker = if field.required { "*" } else { " " };
    let shown = match field.kind {
        FieldKind::Choice(ChoiceSource::Users) => app
            .directory
            .user_name(value)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        _ => value.to_string(),
    };
    let shown = match field.kind {
        FieldKind::Choice(_) if focused => format!("< {} >", shown),
        FieldKind::Derived { .. } => format!("{} (auto)", shown),
        _ if focused => format!("{}_", shown),
        _ => shown,
    };

    let label_style = if focused {
        Style::default()
            .fg(app.theme.primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text_dim)
    };
    let value_style = if field.is_read_only() {
        Style::default().fg(app.theme.text_muted)
    } else {
        Style::default().fg(app.theme.text)
    };
    Line::from(vec![
        Span::styled(format!("{}{:<18}", marker, field.label), label_style),
        Span::styled(shown, value_style),
    ])
}
