//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    category::{self, Category},
    scan::{AssetEntry, ScanResult},
};
use crate::ui::{grid::GridState, lightbox::LightboxHitZones, tree_widget::TreeWidgetState};

use super::thumbs::Thumb;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Browser,
    Help,
    Preview,
    Warning,
}

/// Which pane receives navigation keys in the browser view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneFocus {
    #[default]
    Tree,
    Grid,
}

/// A blocking one-line dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub title: String,
    pub message: String,
}

/// Top-level application state.
pub struct AppState {
    /// The static category hierarchy, resolved against the library root.
    pub categories: Vec<Category>,
    /// Expanded flag per top-level category.
    pub expanded: Vec<bool>,
    /// Tree widget selection / scroll.
    pub tree_state: TreeWidgetState,
    /// Directory of the last activated category (shown in the path bar).
    pub current_dir: Option<PathBuf>,
    /// Result of the last scan, in traversal order.
    pub entries: Vec<AssetEntry>,
    pub asset_count: usize,
    /// Grid widget selection / scroll / geometry.
    pub grid_state: GridState,
    /// Decoded thumbnails for the current scan.
    pub thumbs: HashMap<PathBuf, Thumb>,
    /// Bumped on every scan so late decoder results can be dropped.
    pub thumb_generation: u64,
    /// Cancels the decoder batch belonging to the previous scan.
    pub thumb_cancel: Arc<AtomicBool>,
    /// Entry shown in the preview lightbox.
    pub preview_index: usize,
    /// Lightbox click targets from the last frame.
    pub lightbox_zones: Option<LightboxHitZones>,
    pub pane_focus: PaneFocus,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    pub warning: Option<Warning>,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Last left-clicked grid card and click time, for double-click.
    pub last_left_click: Option<(usize, Instant)>,
    /// Full terminal area from the last frame (for mouse hit-testing).
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let categories = category::build_categories(&config.root);
        let expanded = vec![true; categories.len()];
        Self {
            categories,
            expanded,
            tree_state: TreeWidgetState::default(),
            current_dir: None,
            entries: Vec::new(),
            asset_count: 0,
            grid_state: GridState::default(),
            thumbs: HashMap::new(),
            thumb_generation: 0,
            thumb_cancel: Arc::new(AtomicBool::new(false)),
            preview_index: 0,
            lightbox_zones: None,
            pane_focus: PaneFocus::default(),
            active_view: ActiveView::default(),
            warning: None,
            status_message: None,
            config,
            should_quit: false,
            last_left_click: None,
            terminal_area: Rect::default(),
        }
    }

    /// Replace the grid contents with a fresh scan of `dir`.
    ///
    /// Drops every decoded thumbnail and cancels decoding for the old list.
    pub fn show_scan(&mut self, dir: &Path, result: ScanResult) {
        self.thumb_cancel.store(true, Ordering::Relaxed);
        self.thumb_cancel = Arc::new(AtomicBool::new(false));
        self.thumb_generation = self.thumb_generation.wrapping_add(1);
        self.thumbs.clear();

        self.entries = result.entries;
        self.asset_count = result.count;
        self.grid_state.reset();
        self.preview_index = 0;
        self.last_left_click = None;
        self.current_dir = Some(dir.to_path_buf());
    }

    /// The grid entry under the cursor, if any.
    pub fn selected_entry(&self) -> Option<&AssetEntry> {
        self.entries.get(self.grid_state.selected)
    }

    pub fn show_warning(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.warning = Some(Warning {
            title: title.into(),
            message: message.into(),
        });
        self.active_view = ActiveView::Warning;
    }

    pub fn dismiss_warning(&mut self) {
        self.warning = None;
        self.active_view = ActiveView::Browser;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> AssetEntry {
        AssetEntry {
            name: name.to_string(),
            base_name: name.to_string(),
            thumbnail: PathBuf::from(format!("/lib/{name}_tmb.jpg")),
            dir: PathBuf::from("/lib"),
        }
    }

    fn state() -> AppState {
        let config = AppConfig {
            root: PathBuf::from("/lib"),
            ..AppConfig::default()
        };
        AppState::new(config)
    }

    #[test]
    fn new_state_expands_every_category() {
        let s = state();
        assert_eq!(s.categories.len(), s.expanded.len());
        assert!(s.expanded.iter().all(|&e| e));
        assert_eq!(s.categories[0].path, PathBuf::from("/lib"));
    }

    #[test]
    fn show_scan_resets_list_and_cache() {
        let mut s = state();
        let old_cancel = Arc::clone(&s.thumb_cancel);
        s.thumbs.insert(PathBuf::from("/old_tmb.jpg"), Thumb::Failed);
        s.grid_state.selected = 5;

        let result = ScanResult {
            entries: vec![entry("Fox"), entry("Wolf")],
            count: 2,
        };
        s.show_scan(Path::new("/lib/Characters/Animals"), result);

        assert!(old_cancel.load(Ordering::Relaxed));
        assert!(!s.thumb_cancel.load(Ordering::Relaxed));
        assert_eq!(s.thumb_generation, 1);
        assert!(s.thumbs.is_empty());
        assert_eq!(s.asset_count, 2);
        assert_eq!(s.grid_state.selected, 0);
        assert_eq!(s.selected_entry().map(|e| e.name.as_str()), Some("Fox"));
        assert_eq!(
            s.current_dir.as_deref(),
            Some(Path::new("/lib/Characters/Animals"))
        );
    }

    #[test]
    fn warnings_switch_views() {
        let mut s = state();
        s.show_warning("Unknown OS", "Can't open folder on this OS!");
        assert_eq!(s.active_view, ActiveView::Warning);
        s.dismiss_warning();
        assert_eq!(s.active_view, ActiveView::Browser);
        assert!(s.warning.is_none());
    }
}
