//! The scrollable stack of full-bleed background images.
//!
//! Each image is cropped to fill its slot (no letterboxing) and drawn with
//! Unicode `▀` half blocks: the foreground colour paints the upper pixel of a
//! cell and the background colour the lower one, so one item of `n` rows
//! needs an image `2n` pixels tall.
//!
//! Fitting is the expensive part.  [`FitCache`] keeps cropped copies per
//! item and only rebuilds them when the cell size changes or a new decode
//! lands; rendering itself just copies pixels.

use std::collections::HashMap;
use std::sync::Arc;

use image::{imageops::FilterType, RgbaImage};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::state::ImageSlot;
use crate::core::{gallery::Gallery, scroll::ListScroll};

use super::{spinner, theme::Theme};

// ─── fitting ────────────────────────────────────────────────────

/// Scale and centre-crop `src` so it exactly covers `width × height`.
pub fn fit_cover(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if width == 0 || height == 0 || src.width() == 0 || src.height() == 0 {
        return RgbaImage::new(width, height);
    }

    let (sw, sh) = (src.width() as f64, src.height() as f64);
    let scale = (width as f64 / sw).max(height as f64 / sh);

    // Source region that maps onto the target after scaling.
    let crop_w = ((width as f64 / scale).round() as u32).clamp(1, src.width());
    let crop_h = ((height as f64 / scale).round() as u32).clamp(1, src.height());
    let x = (src.width() - crop_w) / 2;
    let y = (src.height() - crop_h) / 2;

    let cropped = image::imageops::crop_imm(src, x, y, crop_w, crop_h).to_image();
    image::imageops::resize(&cropped, width, height, FilterType::Triangle)
}

/// Per-item cache of images fitted to the current cell size.
#[derive(Debug, Default)]
pub struct FitCache {
    /// `(columns, rows)` the cached images were fitted for.
    cell_size: (u16, u16),
    fitted: HashMap<usize, Arc<RgbaImage>>,
}

impl FitCache {
    /// Drop the fitted copy of one item (after it was re-decoded).
    pub fn invalidate(&mut self, index: usize) {
        self.fitted.remove(&index);
    }

    pub fn get(&self, index: usize) -> Option<&Arc<RgbaImage>> {
        self.fitted.get(&index)
    }

    /// Make sure every visible, decoded item has a fitted copy for a slot of
    /// `columns × rows` cells.
    pub fn prepare(&mut self, scroll: &ListScroll, slots: &[ImageSlot], columns: u16) {
        let cell_size = (columns, scroll.item_rows());
        if cell_size != self.cell_size {
            self.fitted.clear();
            self.cell_size = cell_size;
        }
        let Some(range) = scroll.visible_range() else {
            return;
        };
        let (px_w, px_h) = (columns as u32, scroll.item_rows() as u32 * 2);
        for index in range.first..=range.last {
            if self.fitted.contains_key(&index) {
                continue;
            }
            if let Some(ImageSlot::Ready(src)) = slots.get(index) {
                let t0 = std::time::Instant::now();
                let fitted = fit_cover(src, px_w, px_h);
                tracing::debug!("fit item {index} to {px_w}x{px_h} in {:.2?}", t0.elapsed());
                self.fitted.insert(index, Arc::new(fitted));
            }
        }
    }
}

// ─── widget ─────────────────────────────────────────────────────

pub struct ImageStack<'a> {
    pub gallery: &'a Gallery,
    pub scroll: &'a ListScroll,
    pub slots: &'a [ImageSlot],
    pub fitted: &'a FitCache,
    /// Drives the placeholder spinner.
    pub tick: u64,
}

impl<'a> Widget for ImageStack<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(range) = self.scroll.visible_range() else {
            return;
        };

        for index in range.first..=range.last {
            let top = area.y as isize + self.scroll.item_top(index);
            let slot_rect = visible_slot(area, top, self.scroll.item_rows());
            let Some((slot_rect, skip_rows)) = slot_rect else {
                continue;
            };

            match (self.fitted.get(index), self.slots.get(index)) {
                (Some(img), _) => render_halfblocks(img, skip_rows, slot_rect, buf),
                (None, Some(ImageSlot::Failed(err))) => {
                    let label = self.label(index);
                    render_placeholder(
                        &format!("✕ {label}: {err}"),
                        Theme::error_style(),
                        slot_rect,
                        buf,
                    );
                }
                _ => {
                    let label = self.label(index);
                    render_placeholder(
                        &format!("{} {label}", spinner::frame(self.tick)),
                        Theme::placeholder_style(),
                        slot_rect,
                        buf,
                    );
                }
            }
        }
    }
}

impl ImageStack<'_> {
    fn label(&self, index: usize) -> String {
        self.gallery
            .get(index)
            .map(|s| s.label())
            .unwrap_or_default()
    }
}

/// Part of an item slot that lies inside `area`, plus how many of the
/// item's rows are scrolled off above it.
fn visible_slot(area: Rect, top: isize, rows: u16) -> Option<(Rect, u16)> {
    let area_top = area.y as isize;
    let area_bottom = area.y as isize + area.height as isize;
    let slot_bottom = top + rows as isize;

    let y0 = top.max(area_top);
    let y1 = slot_bottom.min(area_bottom);
    if y1 <= y0 {
        return None;
    }
    let skip = (y0 - top) as u16;
    Some((Rect::new(area.x, y0 as u16, area.width, (y1 - y0) as u16), skip))
}

/// Copy a fitted image into `rect`, starting `skip_rows` cells down the
/// image.
fn render_halfblocks(img: &RgbaImage, skip_rows: u16, rect: Rect, buf: &mut Buffer) {
    let (iw, ih) = (img.width(), img.height());
    for row in 0..rect.height {
        let yt = (skip_rows + row) as u32 * 2;
        if yt >= ih {
            break;
        }
        let yb = yt + 1;
        for col in 0..(rect.width as u32).min(iw) {
            let t = img.get_pixel(col, yt);
            let fg = Color::Rgb(t[0], t[1], t[2]);
            let bg = if yb < ih {
                let b = img.get_pixel(col, yb);
                Color::Rgb(b[0], b[1], b[2])
            } else {
                fg
            };
            if let Some(cell) = buf.cell_mut(Position::new(rect.x + col as u16, rect.y + row)) {
                cell.set_char('▀').set_fg(fg).set_bg(bg);
            }
        }
    }
}

/// Fill `rect` with the placeholder style and centre `text` in it.
fn render_placeholder(text: &str, style: ratatui::style::Style, rect: Rect, buf: &mut Buffer) {
    buf.set_style(rect, style);
    for y in rect.top()..rect.bottom() {
        for x in rect.left()..rect.right() {
            if let Some(cell) = buf.cell_mut(Position::new(x, y)) {
                cell.set_char(' ');
            }
        }
    }

    let width = text.chars().count() as u16;
    let x = rect.x + rect.width.saturating_sub(width) / 2;
    let y = rect.y + rect.height / 2;
    let line = Line::from(Span::styled(text.to_string(), style));
    buf.set_line(x, y, &line, rect.right().saturating_sub(x));
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    #[test]
    fn cover_fills_target_exactly() {
        let src = solid(400, 100, [10, 20, 30]);
        let out = fit_cover(&src, 40, 28);
        assert_eq!(out.dimensions(), (40, 28));
        let p = out.get_pixel(20, 14);
        assert!(p[0].abs_diff(10) <= 1 && p[1].abs_diff(20) <= 1 && p[2].abs_diff(30) <= 1);
    }

    #[test]
    fn cover_crops_the_centre() {
        // Left half red, right half blue: a square crop of a wide image
        // keeps both halves around the centre.
        let src = RgbaImage::from_fn(200, 50, |x, _| {
            if x < 100 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
        });
        let out = fit_cover(&src, 10, 10);
        assert!(out.get_pixel(0, 5)[0] > 200);
        assert!(out.get_pixel(9, 5)[2] > 200);
    }

    #[test]
    fn partially_scrolled_slot_is_clipped() {
        let area = Rect::new(0, 2, 10, 10);
        assert_eq!(visible_slot(area, -2, 6), Some((Rect::new(0, 2, 10, 2), 4)));
        assert_eq!(visible_slot(area, 9, 6), Some((Rect::new(0, 9, 10, 3), 0)));
        assert_eq!(visible_slot(area, 12, 6), None);
        assert_eq!(visible_slot(area, -4, 6), None);
    }

    #[test]
    fn cache_refits_on_size_change_only() {
        let mut scroll = ListScroll::new(2, 4);
        scroll.set_viewport(8);
        let slots = vec![
            ImageSlot::Ready(Arc::new(solid(50, 50, [1, 2, 3]))),
            ImageSlot::Pending,
        ];
        let mut cache = FitCache::default();
        cache.prepare(&scroll, &slots, 12);
        let first = Arc::clone(cache.get(0).unwrap());
        assert_eq!(first.dimensions(), (12, 8));
        assert!(cache.get(1).is_none());

        cache.prepare(&scroll, &slots, 12);
        assert!(Arc::ptr_eq(&first, cache.get(0).unwrap()));

        cache.prepare(&scroll, &slots, 20);
        assert_eq!(cache.get(0).unwrap().dimensions(), (20, 8));
    }

    #[test]
    fn renders_halfblocks_and_placeholders() {
        let gallery = Gallery::builtin();
        let mut scroll = ListScroll::new(gallery.len(), 3);
        scroll.set_viewport(6);
        let mut slots = vec![ImageSlot::Pending; gallery.len()];
        slots[0] = ImageSlot::Ready(Arc::new(solid(8, 8, [200, 100, 50])));
        let mut fitted = FitCache::default();
        fitted.prepare(&scroll, &slots, 8);

        let area = Rect::new(0, 0, 8, 6);
        let mut buf = Buffer::empty(area);
        ImageStack {
            gallery: &gallery,
            scroll: &scroll,
            slots: &slots,
            fitted: &fitted,
            tick: 0,
        }
        .render(area, &mut buf);

        let cell = &buf[(3, 1)];
        assert_eq!(cell.symbol(), "▀");
        assert!(matches!(cell.fg, Color::Rgb(r, _, _) if r.abs_diff(200) <= 1));
        // Second item is still decoding: dark placeholder.
        assert_eq!(buf[(0, 4)].bg, Color::Black);
    }
}
