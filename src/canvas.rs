// Software drawing onto the opaque framebuffer.
// Visual: every overlay shape is alpha-blended over the live camera pixels.
// Pixel (x, y) is sampled at its center (x + 0.5, y + 0.5).

use crate::font;
use crate::paint::{Paint, PaintStyle, TextPaint};
use crate::types::{alpha, rgb_channels, Argb, FrameBuffer, PointF, RectF};

/// What the overlay draws on. The camera host uses `FrameBuffer`; tests can
/// record calls instead of rasterizing.
pub trait Surface {
    fn size(&self) -> (i32, i32);
    fn fill_rect(&mut self, rect: RectF, paint: &Paint);
    fn fill_oval(&mut self, oval: RectF, paint: &Paint);
    /// Stroked line; width from the paint (at least one pixel).
    fn draw_line(&mut self, from: PointF, to: PointF, paint: &Paint);
    /// Filled or stroked depending on the paint style.
    fn draw_round_rect(&mut self, rect: RectF, radius: f32, paint: &Paint);
    /// Text horizontally centered on `center_x`, glyph bottoms on `baseline`.
    fn draw_text(&mut self, text: &str, center_x: f32, baseline: f32, paint: &TextPaint);
}

/// Blend one ARGB color into (x,y) if inside bounds.
/// Visual: the pixel moves toward `color` by its alpha.
#[inline]
fn blend_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: Argb) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let a = alpha(color) as u32;
    if a == 0 {
        return;
    }
    let idx = y * fb.width + x;
    if a == 255 {
        fb.pixels[idx] = color & 0x00FF_FFFF;
        return;
    }
    let old = fb.pixels[idx];
    let (sr, sg, sb) = rgb_channels(color);
    let mix = |s: u8, d: u32| (s as u32 * a + d * (255 - a) + 127) / 255;
    let r = mix(sr, (old >> 16) & 0xFF);
    let g = mix(sg, (old >> 8) & 0xFF);
    let b = mix(sb, old & 0xFF);
    fb.pixels[idx] = (r << 16) | (g << 8) | b;
}

/// Pixel span whose centers fall inside [lo, hi), clipped to [0, limit).
fn pixel_span(lo: f32, hi: f32, limit: usize) -> std::ops::Range<i32> {
    let start = (lo - 0.5).ceil().max(0.0) as i32;
    let end = ((hi - 0.5).ceil() as i32).min(limit as i32);
    start..end.max(start)
}

fn center(x: i32, y: i32) -> PointF {
    PointF::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// Fill every pixel of `bounds` whose center passes `inside`.
fn fill_where(fb: &mut FrameBuffer, bounds: RectF, paint: &Paint, inside: impl Fn(PointF) -> bool) {
    for y in pixel_span(bounds.top, bounds.bottom, fb.height) {
        for x in pixel_span(bounds.left, bounds.right, fb.width) {
            let p = center(x, y);
            if inside(p) {
                blend_pixel(fb, x, y, paint.color_at(p));
            }
        }
    }
}

fn in_round_rect(r: RectF, radius: f32, p: PointF) -> bool {
    if p.x < r.left || p.x >= r.right || p.y < r.top || p.y >= r.bottom {
        return false;
    }
    let radius = radius.min(r.width() / 2.0).min(r.height() / 2.0).max(0.0);
    if radius == 0.0 {
        return true;
    }
    // Distance from the nearest corner circle center, if in a corner box.
    let cx = p.x.clamp(r.left + radius, r.right - radius);
    let cy = p.y.clamp(r.top + radius, r.bottom - radius);
    let (dx, dy) = (p.x - cx, p.y - cy);
    dx * dx + dy * dy <= radius * radius
}

/// Thin line between (x0,y0) and (x1,y1) using Bresenham.
fn bresenham(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, paint: &Paint) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        blend_pixel(fb, x0, y0, paint.color_at(center(x0, y0)));
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

impl Surface for FrameBuffer {
    fn size(&self) -> (i32, i32) {
        (self.width as i32, self.height as i32)
    }

    fn fill_rect(&mut self, rect: RectF, paint: &Paint) {
        fill_where(self, rect, paint, |_| true);
    }

    fn fill_oval(&mut self, oval: RectF, paint: &Paint) {
        let (rx, ry) = (oval.width() / 2.0, oval.height() / 2.0);
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let (cx, cy) = (oval.left + rx, oval.top + ry);
        fill_where(self, oval, paint, |p| {
            let nx = (p.x - cx) / rx;
            let ny = (p.y - cy) / ry;
            nx * nx + ny * ny <= 1.0
        });
    }

    fn draw_line(&mut self, from: PointF, to: PointF, paint: &Paint) {
        let half = paint.stroke_width().max(1.0) / 2.0;
        if from.x == to.x {
            let (top, bottom) = (from.y.min(to.y), from.y.max(to.y));
            self.fill_rect(RectF::new(from.x - half, top, from.x + half, bottom), paint);
        } else if from.y == to.y {
            let (left, right) = (from.x.min(to.x), from.x.max(to.x));
            self.fill_rect(RectF::new(left, from.y - half, right, from.y + half), paint);
        } else {
            bresenham(self, from.x as i32, from.y as i32, to.x as i32, to.y as i32, paint);
        }
    }

    fn draw_round_rect(&mut self, rect: RectF, radius: f32, paint: &Paint) {
        match paint.style {
            PaintStyle::Fill => fill_where(self, rect, paint, |p| in_round_rect(rect, radius, p)),
            PaintStyle::Stroke { width } => {
                let half = width / 2.0;
                let outer = rect.inset(-half);
                let inner = rect.inset(half);
                let inner_radius = (radius - half).max(0.0);
                fill_where(self, outer, paint, |p| {
                    in_round_rect(outer, radius + half, p) && !in_round_rect(inner, inner_radius, p)
                });
            }
        }
    }

    fn draw_text(&mut self, text: &str, center_x: f32, baseline: f32, paint: &TextPaint) {
        let scale = font::scale_for(paint.size);
        let x = (center_x - font::text_width(text, scale) as f32 / 2.0).round() as i32;
        let y = (baseline.round() as i32).saturating_sub(font::CELL_H.saturating_mul(scale));
        let (w, h) = self.size();
        // Shadow pass: offset by one font pixel in black to improve readability.
        let shadow = (alpha(paint.color) as u32) << 24;
        for (dx, color) in [(scale, shadow), (0, paint.color)] {
            font::for_each_lit(text, x.saturating_add(dx), y.saturating_add(dx), scale, |px, py, side| {
                // Only the part of the block that lands on the surface.
                for yy in py.max(0)..py.saturating_add(side).min(h) {
                    for xx in px.max(0)..px.saturating_add(side).min(w) {
                        blend_pixel(self, xx, yy, color);
                    }
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{LinearGradient, TileMode};

    fn fb(w: usize, h: usize) -> FrameBuffer {
        FrameBuffer::new(w, h)
    }

    #[test]
    fn opaque_fill_replaces_pixels_inside_rect_only() {
        let mut s = fb(10, 10);
        s.fill_rect(RectF::new(2.0, 2.0, 5.0, 4.0), &Paint::fill(0xFF11_2233));
        assert_eq!(s.pixels[2 * 10 + 2], 0x0011_2233);
        assert_eq!(s.pixels[3 * 10 + 4], 0x0011_2233);
        assert_eq!(s.pixels[4 * 10 + 2], 0);
        assert_eq!(s.pixels[2 * 10 + 5], 0);
    }

    #[test]
    fn translucent_fill_blends() {
        let mut s = fb(1, 1);
        s.pixels[0] = 0x00FF_FFFF;
        s.fill_rect(RectF::new(0.0, 0.0, 1.0, 1.0), &Paint::fill(0x8000_0000));
        let r = (s.pixels[0] >> 16) & 0xFF;
        assert!((126..=128).contains(&r), "got {r}");
    }

    #[test]
    fn shapes_outside_surface_are_clipped() {
        let mut s = fb(4, 4);
        s.fill_rect(RectF::new(-10.0, -10.0, 100.0, 100.0), &Paint::fill(0xFFFF_FFFF));
        assert!(s.pixels.iter().all(|&p| p == 0x00FF_FFFF));
        s.fill_oval(RectF::new(5.0, 5.0, 5.0, 9.0), &Paint::fill(0xFF00_0000));
    }

    #[test]
    fn vertical_line_uses_stroke_width() {
        let mut s = fb(10, 10);
        s.draw_line(PointF::new(5.0, 0.0), PointF::new(5.0, 10.0), &Paint::stroke(0xFFFF_0000, 2.0));
        assert_eq!(s.pixels[4], 0x00FF_0000);
        assert_eq!(s.pixels[5], 0x00FF_0000);
        assert_eq!(s.pixels[6], 0);
    }

    #[test]
    fn oval_follows_gradient() {
        let mut s = fb(20, 10);
        let g = LinearGradient {
            from: PointF::new(0.0, 0.0),
            to: PointF::new(0.0, 10.0),
            start: 0xFF00_0000,
            end: 0xFF00_00FF,
            tile: TileMode::Clamp,
        };
        s.fill_oval(RectF::new(0.0, 0.0, 20.0, 10.0), &Paint::fill(0xFFFF_FFFF).with_shader(g));
        let top = s.pixels[10] & 0xFF;
        let bottom = s.pixels[9 * 20 + 10] & 0xFF;
        assert!(bottom > top);
        assert_eq!(s.pixels[0], 0, "corner is outside the ellipse");
    }

    #[test]
    fn stroked_round_rect_leaves_center_untouched() {
        let mut s = fb(30, 30);
        s.draw_round_rect(RectF::new(5.0, 5.0, 25.0, 25.0), 4.0, &Paint::stroke(0xFFFF_FFFF, 2.0));
        assert_eq!(s.pixels[15 * 30 + 15], 0);
        assert_eq!(s.pixels[15 * 30 + 5], 0x00FF_FFFF);
    }

    #[test]
    fn text_lands_above_baseline() {
        let mut s = fb(40, 20);
        s.draw_text("I", 20.0, 10.0, &TextPaint { color: 0xFFFF_FFFF, size: 7 });
        assert!(s.pixels[..10 * 40].iter().any(|&p| p == 0x00FF_FFFF));
        assert!(s.pixels[12 * 40..].iter().all(|&p| p == 0));
    }

    #[test]
    fn oversized_text_is_clipped_to_surface() {
        let mut s = fb(16, 16);
        for size in [100_000_000, i32::MAX] {
            s.draw_text("SCAN ME", 8.0, 8.0, &TextPaint { color: 0xFFFF_FFFF, size });
        }
        assert_eq!(s.pixels.len(), 16 * 16);
    }
}
