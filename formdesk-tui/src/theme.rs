//! Ledger theme and color utilities.

use formdesk_core::BannerLevel;
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct LedgerTheme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl LedgerTheme {
    pub fn ledger() -> Self {
        Self {
            bg: Color::Rgb(250, 248, 240),
            bg_highlight: Color::Rgb(222, 232, 245),
            primary: Color::Rgb(31, 78, 121),
            primary_dim: Color::Rgb(98, 130, 160),
            accent: Color::Rgb(176, 120, 30),
            success: Color::Rgb(46, 125, 50),
            warning: Color::Rgb(191, 144, 0),
            error: Color::Rgb(198, 40, 40),
            info: Color::Rgb(2, 119, 189),
            text: Color::Rgb(33, 33, 33),
            text_dim: Color::Rgb(97, 97, 97),
            text_muted: Color::Rgb(158, 158, 158),
            border: Color::Rgb(189, 189, 189),
            border_focus: Color::Rgb(31, 78, 121),
        }
    }
}

pub fn banner_color(level: BannerLevel, theme: &LedgerTheme) -> Color {
    match level {
        BannerLevel::Success => theme.success,
        BannerLevel::Error => theme.error,
        BannerLevel::Info => theme.info,
    }
}

pub fn status_color(status: &str, theme: &LedgerTheme) -> Color {
    match status.trim().to_ascii_lowercase().as_str() {
        "pending" => theme.warning,
        "approved" => theme.success,
        "rejected" => theme.error,
        _ => theme.text,
    }
}
