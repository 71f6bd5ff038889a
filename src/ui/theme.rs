//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── category tree ──────────────────────────────────────────
    pub fn category_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn subcategory_style() -> Style {
        Style::default().fg(Color::White)
    }

    /// The category whose assets are in the grid.
    pub fn loaded_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_unfocused_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Gray)
    }

    // ── grid ───────────────────────────────────────────────────
    pub fn card_label_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn dim_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style(focused: bool) -> Style {
        if focused {
            Style::default().fg(Color::LightBlue)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn button_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Gray)
            .add_modifier(Modifier::BOLD)
    }

    /// The clickable folder path in the top bar.
    pub fn path_style() -> Style {
        Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn count_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning_border_style() -> Style {
        Style::default().fg(Color::LightRed)
    }
}
