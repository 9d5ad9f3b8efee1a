//! Scan indicator drawing.
//!
//! Both styles read the same two inputs, the frame rectangle and the clock
//! position, and share nothing else. Shapes are computed first as plain data
//! ([`ScanShapes`]) and then painted, so the geometry can be checked without
//! rasterizing.

use crate::canvas::Surface;
use crate::paint::{LinearGradient, Paint, TileMode};
use crate::style::{LaserStyle, StyleConfig};
use crate::types::{Argb, FrameRect, PointF, RectF};

/// Stroke width of grid lines.
pub const GRID_STROKE: f32 = 2.0;

/// Same hue, alpha dropped to 0x01: the faint end of every laser gradient.
pub fn shade_color(color: Argb) -> Argb {
    (color & 0x00FF_FFFF) | 0x0100_0000
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScanShapes {
    /// Glowing oval band with its top edge at the clock position.
    Line { band: RectF, paint: Paint },
    /// Fading grid trail ending at the clock position.
    Grid { verticals: Vec<(PointF, PointF)>, horizontals: Vec<(PointF, PointF)>, paint: Paint },
}

#[derive(Clone, Copy, Debug)]
struct DerivedGridHeight {
    cycle: u64,
    frame_height: i32,
    value: i32,
}

#[derive(Debug, Default)]
pub struct ScanPatternRenderer {
    derived: Option<DerivedGridHeight>,
}

impl ScanPatternRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&mut self, style: &StyleConfig, frame: FrameRect, pos: f32, cycle: u64) -> ScanShapes {
        match style.laser_style {
            LaserStyle::Line => line_sweep(style, frame, pos),
            LaserStyle::Grid => {
                let height = self.grid_height(style.grid_height, frame, cycle);
                grid_sweep(style, frame, pos, height)
            }
        }
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, style: &StyleConfig, frame: FrameRect, pos: f32, cycle: u64) {
        match self.shapes(style, frame, pos, cycle) {
            ScanShapes::Line { band, paint } => surface.fill_oval(band, &paint),
            ScanShapes::Grid { verticals, horizontals, paint } => {
                for (from, to) in verticals.iter().chain(&horizontals) {
                    surface.draw_line(*from, *to, &paint);
                }
            }
        }
    }

    /// Configured height, or the frame height when configured as 0.
    /// The derived value is refreshed once per sweep or when the frame resizes.
    fn grid_height(&mut self, configured: i32, frame: FrameRect, cycle: u64) -> i32 {
        if configured > 0 {
            return configured;
        }
        match self.derived {
            Some(d) if d.cycle == cycle && d.frame_height == frame.height() => d.value,
            _ => {
                let value = frame.height().max(0);
                self.derived = Some(DerivedGridHeight { cycle, frame_height: frame.height(), value });
                value
            }
        }
    }
}

fn line_sweep(style: &StyleConfig, frame: FrameRect, pos: f32) -> ScanShapes {
    let thickness = style.laser_thickness as f32;
    let margin = style.margin as f32;
    let left = frame.left as f32;
    let band = RectF::new(left + margin, pos, frame.right as f32 - margin, pos + thickness);
    let gradient = LinearGradient {
        from: PointF::new(left, pos),
        to: PointF::new(left, pos + thickness),
        start: shade_color(style.laser_color),
        end: style.laser_color,
        tile: TileMode::Mirror,
    };
    ScanShapes::Line { band, paint: Paint::fill(style.laser_color).with_shader(gradient) }
}

fn grid_sweep(style: &StyleConfig, frame: FrameRect, pos: f32, grid_height: i32) -> ScanShapes {
    let top = frame.top as f32;
    let left = frame.left as f32;
    let right = frame.right as f32;
    // The trail never extends below the frame, whatever the clock range.
    let pos = pos.min(frame.bottom as f32);
    let columns = style.grid_columns.max(1);
    let trail = grid_height as f32;

    // The trail is at most `grid_height` tall and never starts above the frame.
    let clipped = grid_height > 0 && pos - top > trail;
    let start_y = if clipped { pos - trail } else { top };
    let window = if clipped { trail } else { (pos - top).max(0.0) };

    let unit = (frame.width() as f32 / columns as f32).max(1.0);

    // Positions only grow, so stop at the first one past the frame.
    let verticals = (1..columns)
        .map(|i| left + i as f32 * unit)
        .take_while(|&x| x < right)
        .map(|x| (PointF::new(x, start_y), PointF::new(x, pos)))
        .collect();

    let rows = (window / unit).floor() as i32;
    let horizontals = (0..=rows)
        .map(|i| pos - i as f32 * unit)
        .map(|y| (PointF::new(left, y), PointF::new(right, y)))
        .collect();

    let mid_x = left + frame.width() as f32 / 2.0;
    let gradient = LinearGradient {
        from: PointF::new(mid_x, start_y),
        to: PointF::new(mid_x, pos),
        start: shade_color(style.laser_color),
        end: style.laser_color,
        tile: TileMode::Clamp,
    };
    let paint = Paint::stroke(style.laser_color, GRID_STROKE).with_shader(gradient);
    ScanShapes::Grid { verticals, horizontals, paint }
}
