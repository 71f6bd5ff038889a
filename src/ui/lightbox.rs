//! Full-screen preview overlay.
//!
//! Renders the selected asset's thumbnail large, centred on the terminal,
//! with navigation arrows, a close button and a position indicator
//! (e.g. "3 / 7").

use std::collections::HashMap;
use std::path::PathBuf;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::app::thumbs::Thumb;
use crate::core::scan::AssetEntry;

use super::image::render_halfblocks;

/// The preview overlay widget.
pub struct LightboxWidget<'a> {
    pub entries: &'a [AssetEntry],
    /// Index into `entries` of the asset on display.
    pub current: usize,
    pub thumbs: &'a HashMap<PathBuf, Thumb>,
}

/// Clickable regions returned after rendering, for mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightboxHitZones {
    pub close_rect: Rect,
    pub prev_rect: Rect,
    pub next_rect: Rect,
}

impl<'a> LightboxWidget<'a> {
    /// Compute the overlay area (centred, 80% of terminal).
    fn overlay_area(terminal: Rect) -> Rect {
        let margin_x = (f32::from(terminal.width) * 0.1).round() as u16;
        let margin_y = (f32::from(terminal.height) * 0.1).round() as u16;
        let width = terminal.width.saturating_sub(margin_x * 2).max(20).min(terminal.width);
        let height = terminal.height.saturating_sub(margin_y * 2).max(8).min(terminal.height);
        Rect::new(
            terminal.x + (terminal.width - width) / 2,
            terminal.y + (terminal.height - height) / 2,
            width,
            height,
        )
    }

    /// Render and return hit zones for mouse interaction.
    pub fn render_and_hit(self, terminal_area: Rect, buf: &mut Buffer) -> LightboxHitZones {
        let area = Self::overlay_area(terminal_area);
        Clear.render(area, buf);

        let total = self.entries.len();
        let entry = self.entries.get(self.current);

        let title = match entry {
            Some(entry) => format!(" {} — {}/{} ", entry.base_name, self.current + 1, total),
            None => " Nothing to preview ".to_string(),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::LightBlue))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        // Close button [X] on the top-right corner of the border.
        let close_rect = Rect::new(area.x + area.width.saturating_sub(5), area.y, 3, 1);
        Paragraph::new(Line::from(Span::styled(
            "[X]",
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )))
        .render(close_rect, buf);

        // Navigation arrows on the left/right edges (vertically centred).
        let arrow_y = area.y + area.height / 2;
        let prev_rect = Rect::new(area.x, arrow_y, 3, 1);
        let next_rect = Rect::new(area.x + area.width.saturating_sub(3), arrow_y, 3, 1);
        let arrow_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        if self.current > 0 {
            Paragraph::new(Span::styled(" ◀", arrow_style)).render(prev_rect, buf);
        }
        if self.current + 1 < total {
            Paragraph::new(Span::styled("▶ ", arrow_style)).render(next_rect, buf);
        }

        if let Some(entry) = entry {
            let img_area = Rect::new(
                inner.x.saturating_add(2),
                inner.y,
                inner.width.saturating_sub(4),
                inner.height.saturating_sub(1), // footer row
            );
            let note = match self.thumbs.get(&entry.thumbnail) {
                Some(Thumb::Ready(img)) => {
                    render_halfblocks(img, img_area, buf);
                    None
                }
                Some(Thumb::Failed) => Some("Preview unavailable"),
                Some(Thumb::Loading) | None => Some("Loading…"),
            };
            if let Some(note) = note {
                Paragraph::new(Span::styled(note, Style::default().fg(Color::DarkGray)))
                    .alignment(Alignment::Center)
                    .render(Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1), buf);
            }
        }

        let footer_y = inner.y + inner.height.saturating_sub(1);
        Paragraph::new(Span::styled(
            " ←/→ navigate   Enter open model   Esc close ",
            Style::default().fg(Color::DarkGray),
        ))
        .render(Rect::new(inner.x, footer_y, inner.width, 1), buf);

        LightboxHitZones {
            close_rect,
            prev_rect,
            next_rect,
        }
    }
}
