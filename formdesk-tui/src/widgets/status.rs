//! Footer status line: the live banner, or the key hints when there is none.

use formdesk_core::Banner;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct StatusIndicator<'a> {
    pub banner: Option<&'a Banner>,
    pub hint: &'a str,
    pub banner_style: Style,
    pub hint_style: Style,
}

impl<'a> StatusIndicator<'a> {
    pub fn text(&self) -> String {
        match self.banner {
            Some(banner) => format!("{}: {}", banner.level.label(), banner.message),
            None => self.hint.to_string(),
        }
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let style = if self.banner.is_some() {
            self.banner_style
        } else {
            self.hint_style
        };
        let paragraph = Paragraph::new(self.text())
            .style(style)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}
