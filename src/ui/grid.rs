//! Thumbnail grid — one card per scanned asset.
//!
//! Cards have a fixed footprint; the number of columns follows the pane
//! width.  The widget records the geometry it used so the input handler can
//! page and hit-test without recomputing the layout.

use std::collections::HashMap;
use std::ops::Range;
use std::path::PathBuf;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, StatefulWidget, Widget},
};

use crate::app::thumbs::Thumb;
use crate::core::scan::AssetEntry;

use super::{image::render_halfblocks, theme::Theme};

/// Card width in cells, including a one-cell gutter on the right.
pub const CARD_WIDTH: u16 = 21;
/// Card height in rows, including a one-row gutter below the label.
pub const CARD_HEIGHT: u16 = 10;
/// Shown under cards whose display name is empty.
const UNNAMED_LABEL: &str = "(unnamed)";

// ───────────────────────────────────────── state ─────────────

#[derive(Debug, Default, Clone)]
pub struct GridState {
    /// Index into the entry list.
    pub selected: usize,
    /// First visible card row.
    pub offset_row: usize,
    /// Columns that fit in the last rendered area.
    pub columns: usize,
    /// Card rows that fit in the last rendered area.
    pub rows: usize,
    /// Inner area of the last render, for mouse hit-testing.
    pub inner: Rect,
}

impl GridState {
    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset_row = 0;
    }

    fn cols(&self) -> usize {
        self.columns.max(1)
    }

    fn page(&self) -> usize {
        self.cols() * self.rows.max(1)
    }

    pub fn move_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_right(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected >= self.cols() {
            self.selected -= self.cols();
        }
    }

    /// Move one row down; on a short last row, land on the final card.
    pub fn move_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let cols = self.cols();
        if self.selected + cols < len {
            self.selected += cols;
        } else if self.selected / cols < (len - 1) / cols {
            self.selected = len - 1;
        }
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.page());
    }

    pub fn page_down(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + self.page()).min(len - 1);
        }
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Whether the cursor sits in the leftmost column.
    pub fn at_left_edge(&self) -> bool {
        self.selected % self.cols() == 0
    }

    /// Keep the selected card's row inside the viewport.
    pub fn clamp_scroll(&mut self) {
        let row = self.selected / self.cols();
        if row < self.offset_row {
            self.offset_row = row;
        } else if self.rows > 0 && row >= self.offset_row + self.rows {
            self.offset_row = row + 1 - self.rows;
        }
    }

    /// Entry indices drawn by the last render.  Empty before the first frame.
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        if self.columns == 0 || self.rows == 0 {
            return 0..0;
        }
        let start = (self.offset_row * self.columns).min(len);
        let end = (start + self.columns * self.rows).min(len);
        start..end
    }

    /// Entry index of the card under a terminal cell.
    pub fn index_at(&self, column: u16, row: u16, len: usize) -> Option<usize> {
        let inner = self.inner;
        if column < inner.x
            || row < inner.y
            || column >= inner.x + inner.width
            || row >= inner.y + inner.height
        {
            return None;
        }
        let col = ((column - inner.x) / CARD_WIDTH) as usize;
        let card_row = ((row - inner.y) / CARD_HEIGHT) as usize;
        if col >= self.columns {
            return None;
        }
        let idx = (self.offset_row + card_row) * self.columns + col;
        (idx < len).then_some(idx)
    }

    fn fit(&mut self, inner: Rect, len: usize) {
        self.inner = inner;
        self.columns = usize::from((inner.width / CARD_WIDTH).max(1));
        self.rows = usize::from((inner.height / CARD_HEIGHT).max(1));
        self.selected = self.selected.min(len.saturating_sub(1));
        self.clamp_scroll();
    }
}

// ───────────────────────────────────────── widget ────────────

pub struct AssetGrid<'a> {
    entries: &'a [AssetEntry],
    thumbs: &'a HashMap<PathBuf, Thumb>,
    block: Option<Block<'a>>,
    focused: bool,
    /// Message shown when there is nothing to list.
    placeholder: &'a str,
}

impl<'a> AssetGrid<'a> {
    pub fn new(entries: &'a [AssetEntry], thumbs: &'a HashMap<PathBuf, Thumb>) -> Self {
        Self {
            entries,
            thumbs,
            block: None,
            focused: false,
            placeholder: "",
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = text;
        self
    }

    fn render_card(&self, entry: &AssetEntry, card: Rect, selected: bool, buf: &mut Buffer) {
        let image_area = Rect::new(
            card.x,
            card.y,
            card.width,
            card.height.saturating_sub(1),
        );
        match self.thumbs.get(&entry.thumbnail) {
            Some(Thumb::Ready(img)) => render_halfblocks(img, image_area, buf),
            Some(Thumb::Failed) => centred_note("no preview", image_area, buf),
            Some(Thumb::Loading) | None => centred_note("…", image_area, buf),
        }

        let label_style = if selected && self.focused {
            Theme::selected_style()
        } else if selected {
            Theme::selected_unfocused_style()
        } else {
            Theme::card_label_style()
        };
        let label_area = Rect::new(card.x, card.y + card.height.saturating_sub(1), card.width, 1);
        Paragraph::new(Line::from(Span::styled(card_label(entry), label_style)))
            .alignment(Alignment::Center)
            .render(label_area, buf);
    }
}

/// Label under a card.  A bare `_tmb.jpg` has no name of its own.
fn card_label(entry: &AssetEntry) -> &str {
    if entry.name.is_empty() {
        UNNAMED_LABEL
    } else {
        &entry.name
    }
}

fn centred_note(text: &str, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }
    let y = area.y + area.height / 2;
    Paragraph::new(Line::from(Span::styled(text, Theme::dim_style())))
        .alignment(Alignment::Center)
        .render(Rect::new(area.x, y, area.width, 1), buf);
}

impl<'a> StatefulWidget for AssetGrid<'a> {
    type State = GridState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        state.fit(inner, self.entries.len());

        if self.entries.is_empty() {
            centred_note(self.placeholder, inner, buf);
            return;
        }

        let range = state.visible_range(self.entries.len());
        let start = range.start;
        for idx in range {
            let slot = idx - start;
            let col = (slot % state.columns) as u16;
            let row = (slot / state.columns) as u16;
            let card = Rect::new(
                inner.x + col * CARD_WIDTH,
                inner.y + row * CARD_HEIGHT,
                CARD_WIDTH - 1,
                CARD_HEIGHT - 1,
            )
            .intersection(inner);
            if card.is_empty() {
                continue;
            }
            self.render_card(&self.entries[idx], card, idx == state.selected, buf);
        }
    }
}
