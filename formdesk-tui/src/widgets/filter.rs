//! Filter bar widget.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// One labelled filter input. `active` means it currently narrows the list.
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub key: char,
    pub label: String,
    pub value: String,
    pub active: bool,
    pub editing: bool,
}

impl FilterOption {
    pub fn new(key: char, label: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            key,
            label: label.into(),
            active: !value.trim().is_empty(),
            value,
            editing: false,
        }
    }

    pub fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }

    fn text(&self) -> String {
        let value = if self.value.is_empty() && !self.editing {
            "-"
        } else {
            self.value.as_str()
        };
        let cursor = if self.editing { "_" } else { "" };
        format!(" [{}] {}: {}{} ", self.key, self.label, value, cursor)
    }
}

pub struct FilterBar<'a> {
    pub title: &'a str,
    pub filters: &'a [FilterOption],
    pub active_style: Style,
    pub inactive_style: Style,
    pub editing_style: Style,
}

impl<'a> FilterBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let spans: Vec<Span> = self
            .filters
            .iter()
            .map(|filter| {
                let style = if filter.editing {
                    self.editing_style
                } else if filter.active {
                    self.active_style
                } else {
                    self.inactive_style
                };
                Span::styled(filter.text(), style)
            })
            .collect();

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().title(self.title).borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}
