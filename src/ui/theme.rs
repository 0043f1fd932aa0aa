//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── glass card ─────────────────────────────────────────────
    /// Tint mixed into the frosted cells.
    pub const GLASS_TINT: (u8, u8, u8) = (255, 255, 255);
    /// Effective tint opacity: white at 0.5 inside a layer at 0.6.
    pub const GLASS_OPACITY: f32 = 0.5 * 0.6;
    /// Darkening applied to the shadow row below the card.
    pub const SHADOW_STRENGTH: f32 = 0.45;

    pub fn glass_title_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    // ── image list ─────────────────────────────────────────────
    pub fn placeholder_style() -> Style {
        Style::default().fg(Color::DarkGray).bg(Color::Black)
    }

    pub fn error_style() -> Style {
        Style::default().fg(Color::LightRed).bg(Color::Black)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn status_accent_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn spinner_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }
}
