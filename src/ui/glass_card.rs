//! The frosted-glass card.
//!
//! Drawn *after* the image stack, on top of it: the widget reads back the
//! colours already in the buffer, blurs them, mixes in a white tint and
//! writes them back as half blocks, so whatever scrolls underneath shows
//! through softened.  A one-row shadow darkens the cells just below.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;

pub const CARD_TITLE: &str = "Glassmorphism Demo";

type Rgb = (u8, u8, u8);

/// Glass card overlay at a vertical offset inside the list area.
pub struct GlassCard<'a> {
    /// Rows from the top of the area to the card's top edge.
    pub offset: f64,
    /// Card height in rows.
    pub rows: u16,
    pub title: &'a str,
}

impl<'a> GlassCard<'a> {
    pub fn new(offset: f64, rows: u16) -> Self {
        Self {
            offset,
            rows,
            title: CARD_TITLE,
        }
    }
}

/// On-screen rectangle of the card, clipped to `area`.
pub fn card_rect(area: Rect, offset: f64, rows: u16) -> Option<Rect> {
    if rows == 0 || area.width == 0 || area.height == 0 {
        return None;
    }
    let offset = if offset.is_finite() { offset.round().max(0.0) } else { 0.0 };
    let rel = offset.min(u16::MAX as f64) as u16;
    if rel >= area.height {
        return None;
    }
    let y = area.y + rel;
    let height = rows.min(area.bottom() - y);
    Some(Rect::new(area.x, y, area.width, height))
}

/// Mix `c` toward `tint` by `alpha` (0 = untouched, 1 = pure tint).
pub fn blend(c: Rgb, tint: Rgb, alpha: f32) -> Rgb {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |c: u8, t: u8| (c as f32 * (1.0 - a) + t as f32 * a).round() as u8;
    (mix(c.0, tint.0), mix(c.1, tint.1), mix(c.2, tint.2))
}

/// Darken `c` by `amount` (0 = untouched, 1 = black).
pub fn darken(c: Rgb, amount: f32) -> Rgb {
    blend(c, (0, 0, 0), amount)
}

/// Best-effort RGB for a terminal colour.
fn to_rgb(color: Color) -> Rgb {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        Color::Black | Color::Reset => (0, 0, 0),
        Color::Red => (128, 0, 0),
        Color::Green => (0, 128, 0),
        Color::Yellow => (128, 128, 0),
        Color::Blue => (0, 0, 128),
        Color::Magenta => (128, 0, 128),
        Color::Cyan => (0, 128, 128),
        Color::Gray => (192, 192, 192),
        Color::DarkGray => (128, 128, 128),
        Color::LightRed => (255, 0, 0),
        Color::LightGreen => (0, 255, 0),
        Color::LightYellow => (255, 255, 0),
        Color::LightBlue => (0, 0, 255),
        Color::LightMagenta => (255, 0, 255),
        Color::LightCyan => (0, 255, 255),
        Color::White => (255, 255, 255),
        Color::Indexed(i) => indexed_to_rgb(i),
    }
}

/// xterm 256-colour cube and grey ramp; the 16 system colours are
/// approximated by grey.
fn indexed_to_rgb(i: u8) -> Rgb {
    match i {
        16..=231 => {
            let i = i - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            (level(i / 36), level((i / 6) % 6), level(i % 6))
        }
        232..=255 => {
            let v = 8 + (i - 232) * 10;
            (v, v, v)
        }
        _ => (128, 128, 128),
    }
}

/// Upper and lower half-pixel colours of a cell.  Text cells paint their
/// background only, so both halves read as the background.
fn cell_pixels(buf: &Buffer, x: u16, y: u16) -> (Rgb, Rgb) {
    match buf.cell(Position::new(x, y)) {
        Some(cell) if cell.symbol() == "▀" => (to_rgb(cell.fg), to_rgb(cell.bg)),
        Some(cell) => {
            let bg = to_rgb(cell.bg);
            (bg, bg)
        }
        None => ((0, 0, 0), (0, 0, 0)),
    }
}

/// Half-pixel grid of `rect`: `width × 2·height` colours, row-major.
fn read_pixels(buf: &Buffer, rect: Rect) -> Vec<Rgb> {
    let w = rect.width as usize;
    let mut px = vec![(0, 0, 0); w * rect.height as usize * 2];
    for row in 0..rect.height {
        for col in 0..rect.width {
            let (top, bottom) = cell_pixels(buf, rect.x + col, rect.y + row);
            let base = row as usize * 2 * w + col as usize;
            px[base] = top;
            px[base + w] = bottom;
        }
    }
    px
}

/// 3×3 box blur with clamped edges.
fn box_blur(px: &[Rgb], w: usize, h: usize) -> Vec<Rgb> {
    let mut out = vec![(0, 0, 0); px.len()];
    for y in 0..h {
        for x in 0..w {
            let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
            for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                    let c = px[ny * w + nx];
                    r += c.0 as u32;
                    g += c.1 as u32;
                    b += c.2 as u32;
                    n += 1;
                }
            }
            out[y * w + x] = ((r / n) as u8, (g / n) as u8, (b / n) as u8);
        }
    }
    out
}

impl<'a> Widget for GlassCard<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(rect) = card_rect(area, self.offset, self.rows) else {
            return;
        };
        // Clip against the buffer too, in case `area` extends past it.
        let rect = rect.intersection(buf.area);
        if rect.is_empty() {
            return;
        }

        // ── frost ────────────────────────────────────────────────
        let (w, h) = (rect.width as usize, rect.height as usize * 2);
        let frosted = box_blur(&read_pixels(buf, rect), w, h);
        for row in 0..rect.height {
            for col in 0..rect.width {
                let base = row as usize * 2 * w + col as usize;
                let top = blend(frosted[base], Theme::GLASS_TINT, Theme::GLASS_OPACITY);
                let bottom = blend(frosted[base + w], Theme::GLASS_TINT, Theme::GLASS_OPACITY);
                if let Some(cell) = buf.cell_mut(Position::new(rect.x + col, rect.y + row)) {
                    cell.reset();
                    cell.set_char('▀')
                        .set_fg(Color::Rgb(top.0, top.1, top.2))
                        .set_bg(Color::Rgb(bottom.0, bottom.1, bottom.2));
                }
            }
        }

        // ── shadow ───────────────────────────────────────────────
        let shadow_y = rect.bottom();
        if shadow_y < area.bottom() && shadow_y < buf.area.bottom() {
            for x in rect.left()..rect.right() {
                let (top, bottom) = cell_pixels(buf, x, shadow_y);
                if let Some(cell) = buf.cell_mut(Position::new(x, shadow_y)) {
                    let top = darken(top, Theme::SHADOW_STRENGTH);
                    // Fade out over the lower half pixel.
                    let bottom = darken(bottom, Theme::SHADOW_STRENGTH / 2.0);
                    cell.reset();
                    cell.set_char('▀')
                        .set_fg(Color::Rgb(top.0, top.1, top.2))
                        .set_bg(Color::Rgb(bottom.0, bottom.1, bottom.2));
                }
            }
        }

        // ── title ────────────────────────────────────────────────
        // Centred on the card's full height; hidden when that row is
        // clipped away.
        let title_rel = self.rows / 2;
        if title_rel >= rect.height || self.title.is_empty() {
            return;
        }
        let y = rect.y + title_rel;
        let width = self.title.chars().count() as u16;
        let x = rect.x + rect.width.saturating_sub(width) / 2;
        for col in x..rect.right().min(x + width) {
            // Text hides the half-block split; keep the average as backdrop.
            let (top, bottom) = cell_pixels(buf, col, y);
            let avg = blend(top, bottom, 0.5);
            if let Some(cell) = buf.cell_mut(Position::new(col, y)) {
                cell.set_bg(Color::Rgb(avg.0, avg.1, avg.2));
            }
        }
        let line = Line::from(Span::styled(self.title, Theme::glass_title_style()));
        buf.set_line(x, y, &line, rect.right().saturating_sub(x));
    }
}
