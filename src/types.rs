// Core types shared by the overlay, the rasterizer and the camera host.

/// Opaque frame the window shows. Each pixel is 0x00RRGGBB for minifb.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // length = width * height
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

/// Colors carry alpha: 0xAARRGGBB.
pub type Argb = u32;

#[inline]
pub fn alpha(c: Argb) -> u8 { (c >> 24) as u8 }

#[inline]
pub fn rgb_channels(c: Argb) -> (u8, u8, u8) {
    ((c >> 16) as u8, (c >> 8) as u8, c as u8)
}

#[inline]
pub fn argb(a: u8, r: u8, g: u8, b: u8) -> Argb {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Axis-aligned integer rectangle in surface pixels.
/// `right`/`bottom` are edges, so `width() == right - left`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl FrameRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 { self.right - self.left }
    pub fn height(&self) -> i32 { self.bottom - self.top }

    pub fn is_empty(&self) -> bool { self.width() <= 0 || self.height() <= 0 }
}

/// Float rectangle used for shapes handed to a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Square of half-size `radius` around a center.
    pub fn around(center: PointF, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, center.x + radius, center.y + radius)
    }

    /// Shrink every edge by `d` (negative grows).
    pub fn inset(self, d: f32) -> Self {
        Self::new(self.left + d, self.top + d, self.right - d, self.bottom - d)
    }

    pub fn width(&self) -> f32 { self.right - self.left }
    pub fn height(&self) -> f32 { self.bottom - self.top }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub fn new(x: f32, y: f32) -> Self { Self { x, y } }
}

/// Points reported by a successful decode, relative to the preview.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionResult {
    pub points: Vec<PointF>,
    pub scale_factor: f32,
}
