//! Detail pane for the selected record, with requester / approver stamps.

use crate::state::{App, Stamp};
use crate::views::helpers::humanize;
use crate::widgets::DetailPanel;
use formdesk_core::FieldDisplay;
use ratatui::{layout::Rect, style::Style, Frame};
use serde_json::Value;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(detail) = app.detail.as_ref() else {
        return;
    };
    let record = &detail.record;

    let fields: Vec<(String, String)> = record
        .fields()
        .iter()
        .map(|(key, value)| {
            let text = match value {
                Value::Array(_) => format!("{} item(s)", record.line_items(key)),
                _ => app.directory.display(record, key).unwrap_or_default(),
            };
            (humanize(key), text)
        })
        .collect();

    let mut stamps = Vec::new();
    if let Some(stamp) = &detail.requested_by {
        push_stamp(&mut stamps, "Requested by", stamp);
    }
    if let Some(stamp) = &detail.approved_by {
        push_stamp(&mut stamps, "Approved by", stamp);
    }

    let panel = DetailPanel {
        title: detail.resource.title(),
        fields,
        stamps,
        label_style: Style::default().fg(app.theme.primary),
        border_style: Style::default().fg(app.theme.border),
    };
    panel.render(f, area);
}

fn push_stamp(fields: &mut Vec<(String, String)>, label: &str, stamp: &Stamp) {
    match &stamp.profile {
        Some(profile) => {
            fields.push((label.to_string(), profile.name.clone()));
            if let Some(url) = &profile.signature_url {
                fields.push((format!("{} signature", label), url.clone()));
            }
        }
        None => fields.push((label.to_string(), format!("#{} (loading)", stamp.user_id))),
    }
}
