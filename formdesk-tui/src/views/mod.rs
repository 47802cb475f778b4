//! View rendering dispatch.

pub mod confirm;
pub mod detail;
pub mod form;
pub mod helpers;
pub mod table;

use crate::nav::ScreenNav;
use crate::state::{App, InputMode};
use crate::theme::banner_color;
use crate::widgets::{FilterBar, FilterOption, PaginationBar, StatusIndicator};
use formdesk_core::Resource;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const TABLE_HINT: &str =
    "Tab screens • j/k move • [ ] page • r rows • / search • s/u dates • c clear • n new • e edit • d delete • Enter details • q quit";
const FORM_HINT: &str = "Tab/↑↓ fields • ←/→ choose • Enter save • Esc cancel";
const INPUT_HINT: &str = "Enter apply • Esc cancel";
const CONFIRM_HINT: &str = "Enter/y delete • Esc/n keep";

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);
    render_filters(f, app, layout[1]);

    let body = if app.detail.is_some() {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(layout[2]);
        detail::render(f, app, columns[1]);
        columns[0]
    } else {
        layout[2]
    };
    table::render(f, app, body);

    render_pagination(f, app, layout[3]);
    render_footer(f, app, layout[4]);

    let screen_area = f.size();
    let listing = &app.active_screen().listing;
    if listing.form.is_open() {
        form::render(f, app, screen_area);
    }
    if listing.confirm.is_open() {
        confirm::render(f, app, screen_area);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let tabs: Vec<Span> = Resource::all()
        .iter()
        .map(|resource| {
            let label = format!(" {}:{} ", (resource.index() + 1) % 10, resource.title());
            if *resource == app.active {
                Span::styled(
                    label,
                    Style::default()
                        .fg(app.theme.primary)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                )
            } else {
                Span::styled(label, Style::default().fg(app.theme.text_dim))
            }
        })
        .collect();
    let title = format!("FORMDESK | {} | Operator: {}", app.active.title(), app.operator.name);
    let header = Paragraph::new(Line::from(tabs)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border))
            .title(Span::styled(title, Style::default().fg(app.theme.primary))),
    );
    f.render_widget(header, area);
}

fn render_filters(f: &mut Frame<'_>, app: &App, area: Rect) {
    let screen = app.active_screen();
    let filter = screen.listing.filter();
    let profile = app.active_profile();

    let mut options = vec![FilterOption::new('/', "Search", filter.search.clone())
        .editing(screen.input == InputMode::Search)];

    if profile.date_field.is_some() {
        let (start, start_editing) = match &screen.input {
            InputMode::StartDate(buffer) => (buffer.clone(), true),
            _ => (format_date(filter.dates.start), false),
        };
        let (end, end_editing) = match &screen.input {
            InputMode::EndDate(buffer) => (buffer.clone(), true),
            _ => (format_date(filter.dates.end), false),
        };
        options.push(FilterOption::new('s', "From", start).editing(start_editing));
        options.push(FilterOption::new('u', "To", end).editing(end_editing));
    }

    if let Some(scope) = profile.status_scope {
        let value = if filter.scope.is_some() { "on" } else { "" };
        options.push(FilterOption::new('p', scope.label, value));
    }

    options.push(FilterOption {
        key: 'r',
        label: "Rows".to_string(),
        value: screen.listing.rows_per_page().get().to_string(),
        active: false,
        editing: false,
    });

    let bar = FilterBar {
        title: "Filters",
        filters: &options,
        active_style: Style::default().fg(app.theme.accent),
        inactive_style: Style::default().fg(app.theme.text_dim),
        editing_style: Style::default()
            .fg(app.theme.primary)
            .add_modifier(Modifier::BOLD),
    };
    bar.render(f, area);
}

fn render_pagination(f: &mut Frame<'_>, app: &App, area: Rect) {
    let view = app.active_screen().listing.view(&app.directory);
    let bar = PaginationBar {
        page: view.page,
        total_pages: view.total_pages,
        filtered: view.filtered,
        total: view.total,
        has_prev: view.has_prev,
        has_next: view.has_next,
        enabled_style: Style::default().fg(app.theme.primary),
        disabled_style: Style::default().fg(app.theme.text_muted),
    };
    bar.render(f, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let listing = &app.active_screen().listing;
    let hint = if listing.confirm.is_open() {
        CONFIRM_HINT
    } else if listing.form.is_open() {
        FORM_HINT
    } else if app.active_screen().input != InputMode::Normal {
        INPUT_HINT
    } else {
        TABLE_HINT
    };
    let banner = app.banner.current();
    let banner_style = banner
        .map(|b| Style::default().fg(banner_color(b.level, &app.theme)))
        .unwrap_or_default();
    let status = StatusIndicator {
        banner,
        hint,
        banner_style,
        hint_style: Style::default().fg(app.theme.text_dim),
    };
    status.render(f, area);
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
