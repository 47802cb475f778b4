//! Common view rendering helpers.

use formdesk_core::{parse_record_date, Column, EntityProfile, FieldDisplay, Record};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// A rectangle `percent_x` wide and `height` rows tall, centred in `area`.
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Text for one table cell. The entity's date column is shown as a plain
/// calendar date whatever format the backend sent.
pub fn cell_text(
    profile: &EntityProfile,
    column: &Column,
    record: &Record,
    display: &dyn FieldDisplay,
) -> String {
    let raw = display.display(record, column.field).unwrap_or_default();
    if profile.date_field == Some(column.field) {
        if let Some(date) = parse_record_date(&raw) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    raw
}

/// Human label for a record field name: `leave_type` becomes `Leave Type`.
pub fn humanize(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
