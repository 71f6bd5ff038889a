//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into pixels on
//! the terminal.  No filesystem I/O happens here.

pub mod grid;
pub mod image;
pub mod layout;
pub mod lightbox;
pub mod popup;
pub mod theme;
pub mod tree_widget;

use ratatui::{
    layout::Alignment,
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::state::{ActiveView, AppState, PaneFocus};

use self::{
    grid::AssetGrid, layout::AppLayout, lightbox::LightboxWidget, popup::HelpPopup,
    popup::WarningPopup, theme::Theme, tree_widget::TreeWidget,
};

/// Draw one full frame and record the geometry the input handler needs.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();
    state.terminal_area = area;
    let layout = AppLayout::from_area(area);

    // ── top bar ────────────────────────────────────────────────
    frame.render_widget(
        Paragraph::new(Span::styled("[ Help ]", Theme::button_style())),
        layout.help_button_area,
    );
    let path_label = state
        .current_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "...".to_string());
    frame.render_widget(
        Paragraph::new(Span::styled(path_label, Theme::path_style())).alignment(Alignment::Center),
        layout.path_area,
    );

    // ── category tree ──────────────────────────────────────────
    let tree_block = Block::default()
        .title(" Categories ")
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style(state.pane_focus == PaneFocus::Tree));
    let tree = TreeWidget::new(&state.categories, &state.expanded)
        .loaded(state.current_dir.as_deref())
        .block(tree_block);
    frame.render_stateful_widget(tree, layout.tree_area, &mut state.tree_state);

    // ── thumbnail grid ─────────────────────────────────────────
    let grid_title = state
        .current_dir
        .as_ref()
        .and_then(|dir| dir.file_name())
        .map(|name| format!(" {} ", name.to_string_lossy()))
        .unwrap_or_else(|| " Models ".to_string());
    let placeholder = if state.current_dir.is_some() {
        "No models in this category"
    } else {
        "Select a category"
    };
    let grid_block = Block::default()
        .title(grid_title)
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style(state.pane_focus == PaneFocus::Grid));
    let grid = AssetGrid::new(&state.entries, &state.thumbs)
        .focused(state.pane_focus == PaneFocus::Grid)
        .placeholder(placeholder)
        .block(grid_block);
    frame.render_stateful_widget(grid, layout.grid_area, &mut state.grid_state);

    // ── status bar ─────────────────────────────────────────────
    let hint = state.config.status_bar_hint();
    let status_text = state.status_message.as_deref().unwrap_or(&hint);
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );
    frame.render_widget(
        Paragraph::new(model_count_label(state.asset_count))
            .alignment(Alignment::Right)
            .style(Theme::count_style()),
        layout.count_area,
    );

    // ── overlays ───────────────────────────────────────────────
    state.lightbox_zones = None;
    match state.active_view {
        ActiveView::Browser => {}
        ActiveView::Help => {
            frame.render_widget(HelpPopup { config: &state.config }, area);
        }
        ActiveView::Warning => {
            if let Some(ref warning) = state.warning {
                frame.render_widget(
                    WarningPopup {
                        title: &warning.title,
                        message: &warning.message,
                    },
                    area,
                );
            }
        }
        ActiveView::Preview => {
            let zones = LightboxWidget {
                entries: &state.entries,
                current: state.preview_index,
                thumbs: &state.thumbs,
            }
            .render_and_hit(area, frame.buffer_mut());
            state.lightbox_zones = Some(zones);
        }
    }
}

fn model_count_label(count: usize) -> String {
    match count {
        1 => "1 model ".to_string(),
        n => format!("{n} models "),
    }
}
