//! Custom Ratatui widget that renders the category hierarchy as an
//! indented, collapsible two-level tree.

use std::path::Path;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::category::Category;

use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the tree widget (selected index, scroll offset).
#[derive(Debug, Default)]
pub struct TreeWidgetState {
    /// Index into the *visible* flat list that is currently highlighted.
    pub selected: usize,
    /// Vertical scroll offset (first visible row).
    pub offset: usize,
}

impl TreeWidgetState {
    pub fn select_next(&mut self, max: usize) {
        if max > 0 && self.selected < max - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Ensure the selected row is visible within the viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }
}

// ───────────────────────────────────────── row model ─────────

/// One rendered row in the tree view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    /// Index of the top-level category.
    pub top: usize,
    /// Index of the child under `top`, for second-level rows.
    pub child: Option<usize>,
}

impl TreeRow {
    pub fn depth(&self) -> usize {
        usize::from(self.child.is_some())
    }

    /// Resolve the row back to its category.
    pub fn category<'c>(&self, categories: &'c [Category]) -> Option<&'c Category> {
        let top = categories.get(self.top)?;
        match self.child {
            Some(i) => top.children.get(i),
            None => Some(top),
        }
    }
}

/// Flatten the hierarchy into visible rows; children of collapsed
/// categories are skipped.
pub fn build_rows(categories: &[Category], expanded: &[bool]) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    for (top, category) in categories.iter().enumerate() {
        rows.push(TreeRow { top, child: None });
        if expanded.get(top).copied().unwrap_or(false) {
            rows.extend((0..category.children.len()).map(|i| TreeRow {
                top,
                child: Some(i),
            }));
        }
    }
    rows
}

// ───────────────────────────────────────── widget ────────────

/// The tree widget itself — created fresh each frame.
pub struct TreeWidget<'a> {
    categories: &'a [Category],
    expanded: &'a [bool],
    block: Option<Block<'a>>,
    /// Directory of the category whose scan is on screen.
    loaded: Option<&'a Path>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(categories: &'a [Category], expanded: &'a [bool]) -> Self {
        Self {
            categories,
            expanded,
            block: None,
            loaded: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Mark the category whose directory is currently listed in the grid.
    pub fn loaded(mut self, dir: Option<&'a Path>) -> Self {
        self.loaded = dir;
        self
    }
}

impl<'a> StatefulWidget for TreeWidget<'a> {
    type State = TreeWidgetState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        // Resolve the inner area (inside the optional block border).
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let rows = build_rows(self.categories, self.expanded);
        if rows.is_empty() {
            return;
        }
        state.selected = state.selected.min(rows.len() - 1);
        state.clamp_scroll(inner.height as usize);

        let visible_rows = rows
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(inner.height as usize);

        for (i, (row_idx, row)) in visible_rows.enumerate() {
            let Some(category) = row.category(self.categories) else {
                continue;
            };
            let y = inner.y + i as u16;
            let is_selected = row_idx == state.selected;
            let is_loaded = self.loaded == Some(category.path.as_path());

            let indent = "  ".repeat(row.depth());
            let icon = if category.has_children() {
                if self.expanded.get(row.top).copied().unwrap_or(false) {
                    "▼ "
                } else {
                    "▶ "
                }
            } else {
                "  "
            };
            let style = if is_selected {
                Theme::selected_style()
            } else if is_loaded {
                Theme::loaded_style()
            } else if row.child.is_some() {
                Theme::subcategory_style()
            } else {
                Theme::category_style()
            };

            let line = Line::from(vec![
                Span::raw(indent),
                Span::styled(format!("{icon}{}", category.name), style),
            ]);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
