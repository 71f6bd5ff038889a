//! Background thumbnail decoding to keep the UI thread responsive.
//!
//! Only cards that are on screen are requested.  Each request batch runs on
//! its own thread and reports back over an unbounded channel; results are
//! tagged with the scan generation so a batch that outlives its directory
//! is ignored.

use std::collections::HashSet;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use tokio::sync::mpsc;

use super::state::{ActiveView, AppState};

/// Longest edge kept after decoding.  Large enough for the preview lightbox.
pub const DECODE_MAX_DIM: u32 = 256;

/// Decoded thumbnails are kept this many grid pages above and below the
/// visible range; everything further away is dropped.
pub const KEEP_PAGES: usize = 2;

/// Cache slot for one thumbnail path.
#[derive(Debug, Clone)]
pub enum Thumb {
    Loading,
    Ready(Arc<RgbaImage>),
    Failed,
}

#[derive(Debug)]
pub struct ThumbUpdate {
    pub generation: u64,
    pub path: PathBuf,
    pub image: Option<Arc<RgbaImage>>,
}

/// Decode `path` and shrink it so neither edge exceeds `max_dim`.
///
/// The format is sniffed from the file contents; a `_tmb.jpg` that is really
/// a PNG still decodes.
pub fn decode_thumbnail(path: &Path, max_dim: u32) -> image::ImageResult<RgbaImage> {
    let img = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    if img.width() <= max_dim && img.height() <= max_dim {
        return Ok(img.to_rgba8());
    }
    Ok(img.thumbnail(max_dim, max_dim).to_rgba8())
}

pub fn spawn_decode_batch(
    tx: mpsc::UnboundedSender<ThumbUpdate>,
    generation: u64,
    paths: Vec<PathBuf>,
    cancel: Arc<AtomicBool>,
) {
    std::thread::spawn(move || {
        for path in paths {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            let image = match decode_thumbnail(&path, DECODE_MAX_DIM) {
                Ok(img) => Some(Arc::new(img)),
                Err(e) => {
                    tracing::debug!("thumbnail: {}: {e}", path.display());
                    None
                }
            };
            if tx.send(ThumbUpdate { generation, path, image }).is_err() {
                break; // receiver dropped
            }
        }
    });
}

/// Entry indices whose thumbnails stay cached around `visible`.
fn keep_window(visible: Range<usize>, page: usize, len: usize) -> Range<usize> {
    let margin = page * KEEP_PAGES;
    visible.start.saturating_sub(margin)..(visible.end + margin).min(len)
}

/// Drop decoded slots outside the keep window.  In-flight slots stay so
/// their results are not requested twice.
fn evict_distant(state: &mut AppState, visible: Range<usize>) {
    let page = state.grid_state.columns * state.grid_state.rows;
    let window = keep_window(visible, page, state.entries.len());
    let mut keep: HashSet<&Path> = state.entries[window]
        .iter()
        .map(|e| e.thumbnail.as_path())
        .collect();
    if state.active_view == ActiveView::Preview {
        if let Some(entry) = state.entries.get(state.preview_index) {
            keep.insert(entry.thumbnail.as_path());
        }
    }
    let before = state.thumbs.len();
    state
        .thumbs
        .retain(|path, slot| matches!(slot, Thumb::Loading) || keep.contains(path.as_path()));
    if state.thumbs.len() < before {
        tracing::debug!("thumbnail: evicted {}", before - state.thumbs.len());
    }
}

/// Paths that should be decoded for the current frame and are not cached yet.
/// Marks them as [`Thumb::Loading`] and evicts thumbnails far off screen.
pub fn take_pending(state: &mut AppState) -> Vec<PathBuf> {
    let visible = state.grid_state.visible_range(state.entries.len());
    evict_distant(state, visible.clone());

    let mut wanted: Vec<usize> = visible.collect();
    if state.active_view == ActiveView::Preview {
        wanted.push(state.preview_index);
    }

    let mut pending = Vec::new();
    for idx in wanted {
        let Some(entry) = state.entries.get(idx) else {
            continue;
        };
        if state.thumbs.contains_key(&entry.thumbnail) {
            continue;
        }
        state.thumbs.insert(entry.thumbnail.clone(), Thumb::Loading);
        pending.push(entry.thumbnail.clone());
    }
    pending
}

/// Queue decoding for everything currently visible.
pub fn request_visible(state: &mut AppState, tx: &mpsc::UnboundedSender<ThumbUpdate>) {
    let pending = take_pending(state);
    if pending.is_empty() {
        return;
    }
    tracing::debug!("thumbnail: decoding {} images", pending.len());
    spawn_decode_batch(
        tx.clone(),
        state.thumb_generation,
        pending,
        Arc::clone(&state.thumb_cancel),
    );
}

/// Store a decoder result.  Returns `false` for stale updates.
pub fn apply_update(state: &mut AppState, update: ThumbUpdate) -> bool {
    if update.generation != state.thumb_generation {
        return false;
    }
    let slot = match update.image {
        Some(img) => Thumb::Ready(img),
        None => Thumb::Failed,
    };
    state.thumbs.insert(update.path, slot);
    true
}
