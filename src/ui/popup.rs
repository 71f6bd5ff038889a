//! Popup overlay widgets for the help dialog and blocking warnings.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::config::{Action, AppConfig};

use super::theme::Theme;

// ───────────────────────────────────────── help popup ────────

/// Usage notes followed by the live key bindings.
pub struct HelpPopup<'a> {
    pub config: &'a AppConfig,
}

/// Free-form usage notes shown above the binding table.
const HELP_NOTES: &[&str] = &[
    "Navigation: arrows, PgUp/PgDn, Home/End, mouse wheel",
    "Load: Enter or click on a category",
    "Open model: Enter on a card",
    "Preview: double click on a card",
    "Open folder: click the path in the top bar",
];

impl<'a> Widget for HelpPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (HELP_NOTES.len() + Action::ALL.len()) as u16 + 6;
        let popup = centered_fixed(60, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Help ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = Vec::new();
        lines.push(Line::raw(""));
        for note in HELP_NOTES {
            lines.push(Line::from(Span::raw(format!("  {note}"))));
        }
        lines.push(Line::raw(""));

        // Fixed-width columns: label left-aligned, keys right-aligned.
        for &action in Action::ALL {
            let label_col = format!("  {:<28}", action.label());
            let keys_width = (inner.width as usize).saturating_sub(label_col.len() + 1).max(1);
            let keys = self.config.display_bindings(action);
            lines.push(Line::from(vec![
                Span::styled(label_col, Style::default().fg(Color::White)),
                Span::styled(format!("{keys:>keys_width$}"), Style::default().fg(Color::Yellow)),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("  Esc: close", dim)));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── warning popup ─────

/// Blocking one-line warning, dismissed with Enter/Esc or a click.
pub struct WarningPopup<'a> {
    pub title: &'a str,
    pub message: &'a str,
}

impl<'a> Widget for WarningPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (self.message.chars().count() as u16 + 6).clamp(30, 70);
        let popup = centered_fixed(width, 7, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(Theme::warning_border_style().add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::warning_border_style());

        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                self.message,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
            Line::from(Span::styled("[ OK ]", Theme::button_style())),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn centered_fixed_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_fixed(20, 4, area), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_fixed(80, 40, area), area);
    }

    #[test]
    fn warning_shows_title_and_message() {
        let area = Rect::new(0, 0, 60, 15);
        let mut buf = Buffer::empty(area);
        WarningPopup {
            title: "Unknown OS",
            message: "Can't open folder on this OS!",
        }
        .render(area, &mut buf);

        let text: Vec<String> = (0..area.height).map(|y| row_text(&buf, y)).collect();
        assert!(text.iter().any(|l| l.contains("Unknown OS")));
        assert!(text.iter().any(|l| l.contains("Can't open folder on this OS!")));
    }

    #[test]
    fn help_lists_bindings() {
        let config = AppConfig::default();
        let area = Rect::new(0, 0, 80, 40);
        let mut buf = Buffer::empty(area);
        HelpPopup { config: &config }.render(area, &mut buf);

        let text: Vec<String> = (0..area.height).map(|y| row_text(&buf, y)).collect();
        assert!(text.iter().any(|l| l.contains("Copy Model Link")));
        assert!(text.iter().any(|l| l.contains("Space/p")));
    }
}
