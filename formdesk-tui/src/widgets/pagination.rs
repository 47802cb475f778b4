//! Pagination footer: Prev / page count / Next.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct PaginationBar {
    pub page: usize,
    pub total_pages: usize,
    pub filtered: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub enabled_style: Style,
    pub disabled_style: Style,
}

impl PaginationBar {
    fn marker(&self, label: &'static str, enabled: bool) -> Span<'static> {
        let style = if enabled {
            self.enabled_style
        } else {
            self.disabled_style
        };
        Span::styled(label, style)
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let counts = if self.filtered == self.total {
            format!("{} records", self.total)
        } else {
            format!("{} of {} records", self.filtered, self.total)
        };
        let line = Line::from(vec![
            self.marker("[ Prev", self.has_prev),
            Span::raw(format!("  Page {} of {}  ", self.page, self.total_pages)),
            self.marker("Next ]", self.has_next),
            Span::styled(format!("   {}", counts), self.disabled_style),
        ]);
        f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}
