//! Unicode half-block image renderer.
//!
//! Each terminal cell shows two vertically stacked pixels: the upper one as
//! the foreground of `▀`, the lower one as the background.

use image::{imageops::FilterType, RgbaImage};
use ratatui::{buffer::Buffer, layout::Position, layout::Rect, style::Color};

/// Pixel size that fits `src` inside `area` (1 px per column, 2 px per row),
/// preserving aspect ratio and never upscaling.
pub fn fit_size(src_w: u32, src_h: u32, area: Rect) -> (u32, u32) {
    if src_w == 0 || src_h == 0 || area.width == 0 || area.height == 0 {
        return (0, 0);
    }
    let max_w = f64::from(area.width);
    let max_h = f64::from(area.height) * 2.0;
    let scale = (max_w / f64::from(src_w))
        .min(max_h / f64::from(src_h))
        .min(1.0);
    let w = (f64::from(src_w) * scale).round().max(1.0) as u32;
    let h = (f64::from(src_h) * scale).round().max(1.0) as u32;
    (w, h)
}

/// Draw `img` fitted and centred inside `area`.
pub fn render_halfblocks(img: &RgbaImage, area: Rect, buf: &mut Buffer) {
    let (fit_w, fit_h) = fit_size(img.width(), img.height(), area);
    if fit_w == 0 || fit_h == 0 {
        return;
    }

    let scaled;
    let rgba = if (fit_w, fit_h) == img.dimensions() {
        img
    } else {
        scaled = image::imageops::resize(img, fit_w, fit_h, FilterType::Triangle);
        &scaled
    };
    let (iw, ih) = rgba.dimensions();

    let used_rows = ih.div_ceil(2) as u16;
    let col_offset = area.width.saturating_sub(iw as u16) / 2;
    let row_offset = area.height.saturating_sub(used_rows) / 2;

    for row in 0..used_rows.min(area.height) {
        let yt = u32::from(row) * 2;
        let yb = yt + 1;
        for col in 0..iw.min(u32::from(area.width)) {
            let t = rgba.get_pixel(col, yt);
            let fg = Color::Rgb(t[0], t[1], t[2]);
            let bg = if yb < ih {
                let b = rgba.get_pixel(col, yb);
                Color::Rgb(b[0], b[1], b[2])
            } else {
                Color::Reset
            };
            let pos = Position::new(
                area.x + col_offset + col as u16,
                area.y + row_offset + row,
            );
            if let Some(cell) = buf.cell_mut(pos) {
                cell.set_char('▀').set_fg(fg).set_bg(bg);
            }
        }
    }
}
