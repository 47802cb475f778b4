//! Two-section key/value panel: record fields, then workflow stamps.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<(String, String)>,
    /// Rendered below the fields after a blank line.
    pub stamps: Vec<(String, String)>,
    pub label_style: Style,
    pub border_style: Style,
}

impl<'a> DetailPanel<'a> {
    fn label_width(&self) -> usize {
        self.fields
            .iter()
            .chain(self.stamps.iter())
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0)
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let width = self.label_width();
        let row = |(label, value): &(String, String)| {
            Line::from(vec![
                Span::styled(format!("{:<width$}  ", label, width = width), self.label_style),
                Span::raw(value.clone()),
            ])
        };
        let mut lines: Vec<Line<'static>> = self.fields.iter().map(row).collect();
        if !self.stamps.is_empty() {
            lines.push(Line::default());
            lines.extend(self.stamps.iter().map(row));
        }
        lines
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(self.border_style);
        let widget = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(widget, area);
    }
}
