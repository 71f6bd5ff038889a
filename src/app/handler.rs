//! Input handling — maps key/mouse events to state mutations.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::Action;
use crate::core::platform::{self, PlatformError};
use crate::core::scan;
use crate::ui::layout::{contains, AppLayout};
use crate::ui::tree_widget::{build_rows, TreeRow};

use super::state::{ActiveView, AppState, PaneFocus};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Windows reports releases too.
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Browser => handle_browser_key(state, key),
        ActiveView::Help => handle_help_key(state, key),
        ActiveView::Warning => handle_warning_key(state, key),
        ActiveView::Preview => handle_preview_key(state, key),
    }
}

// ── Browser (configurable bindings) ─────────────────────────────

fn handle_browser_key(state: &mut AppState, key: KeyEvent) {
    // Navigation keys that should always work.
    match key.code {
        KeyCode::Home => {
            match state.pane_focus {
                PaneFocus::Tree => {
                    state.tree_state.selected = 0;
                    state.tree_state.offset = 0;
                }
                PaneFocus::Grid => {
                    state.grid_state.selected = 0;
                    state.grid_state.clamp_scroll();
                }
            }
            return;
        }
        KeyCode::End => {
            match state.pane_focus {
                PaneFocus::Tree => {
                    let rows = tree_rows(state);
                    state.tree_state.selected = rows.len().saturating_sub(1);
                }
                PaneFocus::Grid => {
                    state.grid_state.select_last(state.entries.len());
                    state.grid_state.clamp_scroll();
                }
            }
            return;
        }
        _ => {}
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    // Actions that do not depend on the focused pane.
    match action {
        Action::Quit => {
            state.should_quit = true;
            return;
        }
        Action::Help => {
            state.active_view = ActiveView::Help;
            return;
        }
        Action::SwitchPane => {
            state.pane_focus = match state.pane_focus {
                PaneFocus::Tree => PaneFocus::Grid,
                PaneFocus::Grid => PaneFocus::Tree,
            };
            return;
        }
        Action::OpenFolder => {
            open_current_folder(state);
            return;
        }
        Action::CopyName => {
            if let Some(name) = state.selected_entry().map(|e| e.base_name.clone()) {
                copy_text(state, "name", &name);
            }
            return;
        }
        Action::CopyFolderLink => {
            if let Some(dir) = state.current_dir.clone() {
                copy_text(state, "folder link", &dir.display().to_string());
            }
            return;
        }
        Action::CopyModelLink => {
            let ext = &state.config.model_extension;
            if let Some(model) = state.selected_entry().map(|e| e.model_path(ext)) {
                copy_text(state, "model link", &model.display().to_string());
            }
            return;
        }
        Action::Preview => {
            open_preview(state);
            return;
        }
        _ => {}
    }

    match state.pane_focus {
        PaneFocus::Tree => handle_tree_action(state, action),
        PaneFocus::Grid => handle_grid_action(state, action),
    }
}

fn handle_tree_action(state: &mut AppState, action: Action) {
    match action {
        Action::MoveUp => state.tree_state.select_prev(),
        Action::MoveDown => {
            let visible_count = tree_rows(state).len();
            state.tree_state.select_next(visible_count);
        }
        Action::PageUp => {
            let page = tree_page(state);
            state.tree_state.selected = state.tree_state.selected.saturating_sub(page);
        }
        Action::PageDown => {
            let page = tree_page(state);
            let last = tree_rows(state).len().saturating_sub(1);
            state.tree_state.selected = (state.tree_state.selected + page).min(last);
        }
        Action::MoveLeft => collapse_selected(state),
        Action::MoveRight => {
            let Some(row) = selected_row(state) else {
                return;
            };
            let expandable = row.child.is_none()
                && state.categories.get(row.top).is_some_and(|c| c.has_children());
            if expandable && !state.expanded[row.top] {
                state.expanded[row.top] = true;
            } else if !state.entries.is_empty() {
                state.pane_focus = PaneFocus::Grid;
            }
        }
        Action::Activate => {
            if let Some(path) = selected_category_path(state) {
                load_directory(state, &path);
            }
        }
        _ => {}
    }
}

fn handle_grid_action(state: &mut AppState, action: Action) {
    let len = state.entries.len();
    match action {
        Action::MoveUp => state.grid_state.move_up(),
        Action::MoveDown => state.grid_state.move_down(len),
        Action::MoveLeft => {
            if state.grid_state.at_left_edge() {
                state.pane_focus = PaneFocus::Tree;
                return;
            }
            state.grid_state.move_left();
        }
        Action::MoveRight => state.grid_state.move_right(len),
        Action::PageUp => state.grid_state.page_up(),
        Action::PageDown => state.grid_state.page_down(len),
        Action::Activate => open_selected_model(state),
        _ => {}
    }
    state.grid_state.clamp_scroll();
}

/// Collapse the selected category, or jump from a child to its parent.
fn collapse_selected(state: &mut AppState) {
    let Some(row) = selected_row(state) else {
        return;
    };
    if row.child.is_some() {
        if let Some(parent) = tree_rows(state)
            .iter()
            .position(|r| r.top == row.top && r.child.is_none())
        {
            state.tree_state.selected = parent;
        }
        return;
    }
    if let Some(expanded) = state.expanded.get_mut(row.top) {
        *expanded = false;
    }
}

fn handle_help_key(state: &mut AppState, key: KeyEvent) {
    let closes = matches!(key.code, KeyCode::Esc | KeyCode::Enter)
        || matches!(state.config.match_key(key), Some(Action::Help | Action::Quit));
    if closes {
        state.active_view = ActiveView::Browser;
    }
}

fn handle_warning_key(state: &mut AppState, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
        state.dismiss_warning();
    }
}

// ── Preview ─────────────────────────────────────────────────────

fn handle_preview_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') => {
            state.active_view = ActiveView::Browser;
            return;
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
            preview_prev(state);
            return;
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
            preview_next(state);
            return;
        }
        KeyCode::Enter => {
            open_selected_model(state);
            return;
        }
        _ => {}
    }
    if state.config.match_key(key) == Some(Action::Preview) {
        state.active_view = ActiveView::Browser;
    }
}

fn open_preview(state: &mut AppState) {
    if state.entries.is_empty() {
        state.status_message = Some("Nothing to preview".to_string());
        return;
    }
    state.preview_index = state.grid_state.selected.min(state.entries.len() - 1);
    state.active_view = ActiveView::Preview;
}

/// Step the preview and keep the grid cursor on the same asset.
fn preview_prev(state: &mut AppState) {
    if state.preview_index > 0 {
        state.preview_index -= 1;
        state.grid_state.selected = state.preview_index;
        state.grid_state.clamp_scroll();
    }
}

fn preview_next(state: &mut AppState) {
    if state.preview_index + 1 < state.entries.len() {
        state.preview_index += 1;
        state.grid_state.selected = state.preview_index;
        state.grid_state.clamp_scroll();
    }
}

// ── Mouse ───────────────────────────────────────────────────────

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    match state.active_view {
        ActiveView::Browser => handle_browser_mouse(state, mouse),
        ActiveView::Preview => handle_preview_mouse(state, mouse),
        ActiveView::Help => {
            if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                state.active_view = ActiveView::Browser;
            }
        }
        ActiveView::Warning => {
            if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                state.dismiss_warning();
            }
        }
    }
}

fn handle_browser_mouse(state: &mut AppState, mouse: MouseEvent) {
    let layout = AppLayout::from_area(state.terminal_area);
    let (col, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if contains(layout.help_button_area, col, row) {
                state.active_view = ActiveView::Help;
            } else if contains(layout.path_area, col, row) {
                open_current_folder(state);
            } else if contains(layout.tree_area, col, row) {
                state.pane_focus = PaneFocus::Tree;
                handle_tree_click(state, layout, col, row);
            } else if contains(layout.grid_area, col, row) {
                state.pane_focus = PaneFocus::Grid;
                handle_grid_click(state, col, row);
            }
        }
        MouseEventKind::ScrollUp => {
            if contains(layout.grid_area, col, row) {
                state.grid_state.move_up();
                state.grid_state.clamp_scroll();
            } else {
                state.tree_state.select_prev();
            }
        }
        MouseEventKind::ScrollDown => {
            if contains(layout.grid_area, col, row) {
                state.grid_state.move_down(state.entries.len());
                state.grid_state.clamp_scroll();
            } else {
                let visible_count = tree_rows(state).len();
                state.tree_state.select_next(visible_count);
            }
        }
        _ => {}
    }
}

/// A click on the expander arrow toggles the category; anywhere else on the
/// row selects and loads it.
fn handle_tree_click(state: &mut AppState, layout: AppLayout, col: u16, row: u16) {
    let content_top = layout.tree_area.y.saturating_add(1);
    let content_bottom = layout
        .tree_area
        .y
        .saturating_add(layout.tree_area.height.saturating_sub(1));
    if row < content_top || row >= content_bottom {
        return;
    }

    let clicked = (row - content_top) as usize + state.tree_state.offset;
    let rows = tree_rows(state);
    let Some(&tree_row) = rows.get(clicked) else {
        return;
    };
    state.tree_state.selected = clicked;

    let arrow_start = layout.tree_area.x + 1 + 2 * tree_row.depth() as u16;
    let on_arrow = col >= arrow_start && col < arrow_start + 2;
    let expandable = tree_row.child.is_none()
        && state.categories.get(tree_row.top).is_some_and(|c| c.has_children());
    if on_arrow && expandable {
        state.expanded[tree_row.top] = !state.expanded[tree_row.top];
        return;
    }

    if let Some(path) = tree_row.category(&state.categories).map(|c| c.path.clone()) {
        load_directory(state, &path);
    }
}

/// Single click selects a card; a second click on the same card within the
/// double-click window opens the preview.
fn handle_grid_click(state: &mut AppState, col: u16, row: u16) {
    let Some(idx) = state.grid_state.index_at(col, row, state.entries.len()) else {
        state.last_left_click = None;
        return;
    };
    state.grid_state.selected = idx;

    let now = Instant::now();
    let window = Duration::from_millis(state.config.double_click_ms);
    let is_repeat = state
        .last_left_click
        .is_some_and(|(last, at)| last == idx && now.duration_since(at) <= window);

    if is_repeat {
        state.last_left_click = None;
        open_preview(state);
    } else {
        state.last_left_click = Some((idx, now));
    }
}

fn handle_preview_mouse(state: &mut AppState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(zones) = state.lightbox_zones else {
                return;
            };
            if contains(zones.close_rect, mouse.column, mouse.row) {
                state.active_view = ActiveView::Browser;
            } else if contains(zones.prev_rect, mouse.column, mouse.row) {
                preview_prev(state);
            } else if contains(zones.next_rect, mouse.column, mouse.row) {
                preview_next(state);
            }
        }
        MouseEventKind::ScrollUp => preview_prev(state),
        MouseEventKind::ScrollDown => preview_next(state),
        _ => {}
    }
}

// ── actions ─────────────────────────────────────────────────────

/// Scan `dir` and replace the grid contents.
pub fn load_directory(state: &mut AppState, dir: &Path) {
    let result = scan::scan(dir);
    tracing::info!("loaded {} models from {}", result.count, dir.display());
    state.status_message = None;
    state.show_scan(dir, result);
}

fn open_current_folder(state: &mut AppState) {
    match state.current_dir.clone() {
        Some(dir) => open_with_os(state, &dir),
        None => state.status_message = Some("Select a category first".to_string()),
    }
}

fn open_selected_model(state: &mut AppState) {
    let ext = state.config.model_extension.clone();
    let Some(entry) = state.selected_entry() else {
        return;
    };
    match entry.existing_model(&ext) {
        Some(model) => open_with_os(state, &model),
        None => {
            let missing = entry.model_path(&ext);
            state.status_message = Some(format!("No model file: {}", missing.display()));
        }
    }
}

/// Hand `path` to the OS and turn failures into a warning dialog.
fn open_with_os(state: &mut AppState, path: &Path) {
    match platform::open_path(path) {
        Ok(()) => {
            state.status_message = Some(format!("Opened {}", path.display()));
        }
        Err(e @ PlatformError::UnsupportedOs) => {
            tracing::warn!("open: {e}");
            state.show_warning("Unknown OS", e.to_string());
        }
        Err(e @ PlatformError::Launch { .. }) => {
            tracing::warn!("open {}: {e}", path.display());
            state.show_warning("Open Failed", e.to_string());
        }
    }
}

fn copy_text(state: &mut AppState, what: &str, text: &str) {
    if platform::copy_to_clipboard(text) {
        state.status_message = Some(format!("Copied {what}: {text}"));
    } else {
        tracing::warn!("clipboard: no tool accepted the {what}");
        state.status_message = Some("Clipboard unavailable".to_string());
    }
}

// ── helpers ─────────────────────────────────────────────────────

fn tree_rows(state: &AppState) -> Vec<TreeRow> {
    build_rows(&state.categories, &state.expanded)
}

fn selected_row(state: &AppState) -> Option<TreeRow> {
    tree_rows(state).get(state.tree_state.selected).copied()
}

fn selected_category_path(state: &AppState) -> Option<PathBuf> {
    selected_row(state)?
        .category(&state.categories)
        .map(|c| c.path.clone())
}

/// Rows visible in the tree pane.
fn tree_page(state: &AppState) -> usize {
    let layout = AppLayout::from_area(state.terminal_area);
    usize::from(layout.tree_area.height.saturating_sub(2)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;
    use std::fs;
    use tempfile::TempDir;

    /// Row of `Animals` with every category expanded.
    const ANIMALS_ROW: usize = 4;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// A library with two thumbnails under `Characters/Animals`.
    fn library() -> (TempDir, AppState) {
        let tmp = TempDir::new().unwrap();
        let animals = tmp.path().join("Characters").join("Animals");
        fs::create_dir_all(&animals).unwrap();
        fs::write(animals.join("Fox_tmb.jpg"), b"").unwrap();
        fs::write(animals.join("Fox_diffuse.png"), b"").unwrap();
        fs::write(animals.join("Wolf_tmb.jpg"), b"").unwrap();

        let config = AppConfig {
            root: tmp.path().to_path_buf(),
            ..AppConfig::default()
        };
        let mut state = AppState::new(config);
        state.terminal_area = Rect::new(0, 0, 100, 30);
        (tmp, state)
    }

    fn load_animals(state: &mut AppState) {
        state.tree_state.selected = ANIMALS_ROW;
        handle_key(state, press(KeyCode::Enter));
    }

    #[test]
    fn ctrl_c_quits_from_any_view() {
        let (_tmp, mut state) = library();
        state.active_view = ActiveView::Help;
        handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(state.should_quit);
    }

    #[test]
    fn key_releases_are_ignored() {
        let (_tmp, mut state) = library();
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key(&mut state, release);
        assert!(!state.should_quit);
    }

    #[test]
    fn activating_a_category_scans_it() {
        let (tmp, mut state) = library();
        load_animals(&mut state);

        assert_eq!(state.asset_count, 2);
        let mut names: Vec<&str> = state.entries.iter().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, ["Fox", "Wolf"]);
        assert_eq!(
            state.current_dir.as_deref(),
            Some(tmp.path().join("Characters").join("Animals").as_path())
        );
    }

    #[test]
    fn activating_all_scans_the_whole_root() {
        let (_tmp, mut state) = library();
        handle_key(&mut state, press(KeyCode::Enter));
        assert_eq!(state.asset_count, 2);
    }

    #[test]
    fn missing_category_directory_is_empty() {
        let (_tmp, mut state) = library();
        state.tree_state.selected = 1; // Items
        handle_key(&mut state, press(KeyCode::Enter));
        assert_eq!(state.asset_count, 0);
        assert!(state.entries.is_empty());
        assert!(state.current_dir.is_some());
    }

    #[test]
    fn collapse_and_expand_top_level() {
        let (_tmp, mut state) = library();
        let expanded_len = tree_rows(&state).len();
        state.tree_state.selected = 2; // Characters
        handle_key(&mut state, press(KeyCode::Left));
        assert!(!state.expanded[2]);
        assert_eq!(tree_rows(&state).len(), expanded_len - 7);

        handle_key(&mut state, press(KeyCode::Right));
        assert!(state.expanded[2]);
        assert_eq!(tree_rows(&state).len(), expanded_len);
    }

    #[test]
    fn left_on_child_jumps_to_parent() {
        let (_tmp, mut state) = library();
        state.tree_state.selected = ANIMALS_ROW;
        handle_key(&mut state, press(KeyCode::Left));
        assert_eq!(state.tree_state.selected, 2);
        assert!(state.expanded[2]);
    }

    #[test]
    fn grid_navigation_and_focus_handoff() {
        let (_tmp, mut state) = library();
        load_animals(&mut state);
        state.grid_state.columns = 3;
        state.grid_state.rows = 2;

        handle_key(&mut state, press(KeyCode::Tab));
        assert_eq!(state.pane_focus, PaneFocus::Grid);
        handle_key(&mut state, press(KeyCode::Right));
        assert_eq!(state.grid_state.selected, 1);
        handle_key(&mut state, press(KeyCode::Right));
        assert_eq!(state.grid_state.selected, 1);
        handle_key(&mut state, press(KeyCode::Home));
        assert_eq!(state.grid_state.selected, 0);

        // Left from the first column returns to the tree.
        handle_key(&mut state, press(KeyCode::Left));
        assert_eq!(state.pane_focus, PaneFocus::Tree);
    }

    #[test]
    fn activate_without_model_file_reports_status() {
        let (_tmp, mut state) = library();
        load_animals(&mut state);
        state.pane_focus = PaneFocus::Grid;
        handle_key(&mut state, press(KeyCode::Enter));

        let status = state.status_message.clone().unwrap_or_default();
        assert!(status.starts_with("No model file"), "{status}");
        assert!(status.ends_with(".c4d"), "{status}");
        assert_eq!(state.active_view, ActiveView::Browser);
    }

    #[test]
    fn preview_steps_through_results() {
        let (_tmp, mut state) = library();
        load_animals(&mut state);

        handle_key(&mut state, press(KeyCode::Char(' ')));
        assert_eq!(state.active_view, ActiveView::Preview);
        assert_eq!(state.preview_index, 0);

        handle_key(&mut state, press(KeyCode::Left));
        assert_eq!(state.preview_index, 0);
        handle_key(&mut state, press(KeyCode::Right));
        assert_eq!(state.preview_index, 1);
        assert_eq!(state.grid_state.selected, 1);
        handle_key(&mut state, press(KeyCode::Right));
        assert_eq!(state.preview_index, 1);

        handle_key(&mut state, press(KeyCode::Esc));
        assert_eq!(state.active_view, ActiveView::Browser);
    }

    #[test]
    fn preview_without_results_stays_in_browser() {
        let (_tmp, mut state) = library();
        handle_key(&mut state, press(KeyCode::Char('p')));
        assert_eq!(state.active_view, ActiveView::Browser);
        assert_eq!(state.status_message.as_deref(), Some("Nothing to preview"));
    }

    #[test]
    fn open_folder_before_selection_is_a_status() {
        let (_tmp, mut state) = library();
        handle_key(&mut state, press(KeyCode::Char('o')));
        assert_eq!(state.active_view, ActiveView::Browser);
        assert_eq!(
            state.status_message.as_deref(),
            Some("Select a category first")
        );
    }

    #[test]
    fn help_opens_and_closes() {
        let (_tmp, mut state) = library();
        handle_key(&mut state, press(KeyCode::Char('?')));
        assert_eq!(state.active_view, ActiveView::Help);
        handle_key(&mut state, press(KeyCode::Esc));
        assert_eq!(state.active_view, ActiveView::Browser);

        handle_mouse(&mut state, click(1, 0));
        assert_eq!(state.active_view, ActiveView::Help);
        handle_mouse(&mut state, click(50, 15));
        assert_eq!(state.active_view, ActiveView::Browser);
    }

    #[test]
    fn warning_is_dismissed_by_enter() {
        let (_tmp, mut state) = library();
        state.show_warning("Unknown OS", "Can't open folder on this OS!");
        handle_key(&mut state, press(KeyCode::Char('q')));
        assert!(!state.should_quit);
        assert_eq!(state.active_view, ActiveView::Warning);
        handle_key(&mut state, press(KeyCode::Enter));
        assert_eq!(state.active_view, ActiveView::Browser);
    }

    #[test]
    fn clicking_a_tree_row_loads_it() {
        let (_tmp, mut state) = library();
        let layout = AppLayout::from_area(state.terminal_area);
        let row = layout.tree_area.y + 1 + ANIMALS_ROW as u16;
        handle_mouse(&mut state, click(layout.tree_area.x + 10, row));

        assert_eq!(state.tree_state.selected, ANIMALS_ROW);
        assert_eq!(state.asset_count, 2);
    }

    #[test]
    fn clicking_the_arrow_toggles_expansion() {
        let (_tmp, mut state) = library();
        let layout = AppLayout::from_area(state.terminal_area);
        let characters_row = layout.tree_area.y + 1 + 2;
        handle_mouse(&mut state, click(layout.tree_area.x + 1, characters_row));
        assert!(!state.expanded[2]);
        assert!(state.current_dir.is_none());
    }

    #[test]
    fn double_click_on_card_opens_preview() {
        let (_tmp, mut state) = library();
        load_animals(&mut state);
        state.grid_state.columns = 3;
        state.grid_state.rows = 2;
        state.grid_state.inner = Rect::new(29, 2, 70, 26);

        handle_mouse(&mut state, click(30, 3));
        assert_eq!(state.pane_focus, PaneFocus::Grid);
        assert_eq!(state.active_view, ActiveView::Browser);
        handle_mouse(&mut state, click(30, 3));
        assert_eq!(state.active_view, ActiveView::Preview);
        assert_eq!(state.preview_index, 0);
    }
}
