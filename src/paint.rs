// Immutable draw descriptors.
// Nothing here is mutated between frames: a renderer builds a `Paint`, hands
// it to a surface by reference, and may keep it around to reuse next frame.

use crate::types::{alpha, argb, rgb_channels, Argb, PointF};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileMode {
    /// Hold the end colors beyond the gradient line.
    Clamp,
    /// Reflect back and forth beyond the gradient line.
    Mirror,
}

/// Two-stop linear gradient between `from` and `to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGradient {
    pub from: PointF,
    pub to: PointF,
    pub start: Argb,
    pub end: Argb,
    pub tile: TileMode,
}

impl LinearGradient {
    /// Color at `p`, projected onto the gradient line.
    pub fn color_at(&self, p: PointF) -> Argb {
        let dx = self.to.x - self.from.x;
        let dy = self.to.y - self.from.y;
        let len2 = dx * dx + dy * dy;
        if len2 <= f32::EPSILON {
            return self.end;
        }
        let t = ((p.x - self.from.x) * dx + (p.y - self.from.y) * dy) / len2;
        let t = match self.tile {
            TileMode::Clamp => t.clamp(0.0, 1.0),
            TileMode::Mirror => {
                let m = t.rem_euclid(2.0);
                if m > 1.0 { 2.0 - m } else { m }
            }
        };
        lerp_argb(self.start, self.end, t)
    }
}

fn lerp_argb(a: Argb, b: Argb, t: f32) -> Argb {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round().clamp(0.0, 255.0) as u8;
    let (ar, ag, ab) = rgb_channels(a);
    let (br, bg, bb) = rgb_channels(b);
    argb(mix(alpha(a), alpha(b)), mix(ar, br), mix(ag, bg), mix(ab, bb))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintStyle {
    Fill,
    Stroke { width: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub color: Argb,
    pub style: PaintStyle,
    pub shader: Option<LinearGradient>,
}

impl Paint {
    pub fn fill(color: Argb) -> Self {
        Self { color, style: PaintStyle::Fill, shader: None }
    }

    pub fn stroke(color: Argb, width: f32) -> Self {
        Self { color, style: PaintStyle::Stroke { width }, shader: None }
    }

    pub fn with_shader(self, shader: LinearGradient) -> Self {
        Self { shader: Some(shader), ..self }
    }

    /// Effective color at a pixel center; the shader wins over `color`.
    #[inline]
    pub fn color_at(&self, p: PointF) -> Argb {
        match &self.shader {
            Some(g) => g.color_at(p),
            None => self.color,
        }
    }

    /// Stroke width, or 0 for fills.
    pub fn stroke_width(&self) -> f32 {
        match self.style {
            PaintStyle::Fill => 0.0,
            PaintStyle::Stroke { width } => width,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextPaint {
    pub color: Argb,
    /// Glyph height in pixels.
    pub size: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical(tile: TileMode) -> LinearGradient {
        LinearGradient {
            from: PointF::new(0.0, 0.0),
            to: PointF::new(0.0, 10.0),
            start: 0x0000_0000,
            end: 0xFF00_00FF,
            tile,
        }
    }

    #[test]
    fn clamp_holds_end_colors() {
        let g = vertical(TileMode::Clamp);
        assert_eq!(g.color_at(PointF::new(3.0, -5.0)), 0x0000_0000);
        assert_eq!(g.color_at(PointF::new(3.0, 25.0)), 0xFF00_00FF);
        assert_eq!(alpha(g.color_at(PointF::new(0.0, 5.0))), 128);
    }

    #[test]
    fn mirror_reflects_past_the_end() {
        let g = vertical(TileMode::Mirror);
        assert_eq!(g.color_at(PointF::new(0.0, 15.0)), g.color_at(PointF::new(0.0, 5.0)));
        assert_eq!(g.color_at(PointF::new(0.0, 20.0)), 0x0000_0000);
    }

    #[test]
    fn shader_overrides_flat_color() {
        let p = Paint::fill(0xFFFF_0000).with_shader(vertical(TileMode::Clamp));
        assert_eq!(p.color_at(PointF::new(0.0, 10.0)), 0xFF00_00FF);
        assert_eq!(Paint::stroke(0, 2.0).stroke_width(), 2.0);
    }
}
