//! The viewfinder overlay.
//!
//! [`OverlayRenderer`] owns the style, the animation clock and the pending
//! detection. The host drives it from one thread: it calls [`OverlayRenderer::draw`]
//! once per refresh and [`OverlayRenderer::on_tick`] whenever the tick
//! registration the overlay asked for comes due. Redraws are requests to the
//! host, never direct calls back into `draw`.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::canvas::Surface;
use crate::clock::{AnimationClock, SWEEP_PERIOD};
use crate::geometry::anchor_on_surface;
use crate::paint::{Paint, TextPaint};
use crate::scan::ScanPatternRenderer;
use crate::scheduler::{TickHandle, TickId};
use crate::style::{StyleConfig, StyleOptions, ValidationIssue};
use crate::types::{DetectionResult, FrameRect, PointF, RectF};

/// Animation tick cadence (~60 Hz).
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);
/// Gap between the hint text baseline and the frame top.
pub const HINT_GAP: f32 = 24.0;

/// Camera-side geometry. Both rectangles stay `None` until the camera
/// pipeline is configured.
pub trait FramingSource {
    /// Framing rectangle in surface pixels.
    fn framing_rect(&self) -> Option<FrameRect>;
    /// The same region in camera-sensor pixels.
    fn framing_rect_in_preview(&self) -> Option<FrameRect>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RedrawError {
    #[error("redraw bounds {0:?} fall outside the surface")]
    OutOfBounds(FrameRect),

    #[error("no frame rectangle known yet")]
    FrameUnknown,
}

/// Scheduling and invalidation services the overlay needs from its host.
pub trait FrameHost {
    fn now(&self) -> Instant;
    fn schedule(&mut self, interval: Duration) -> TickHandle;
    fn cancel(&mut self, handle: TickHandle);
    /// Redraw everything.
    fn request_redraw(&mut self);
    /// Redraw only `bounds`. A hint: hosts may widen it.
    fn request_redraw_in(&mut self, bounds: FrameRect) -> Result<(), RedrawError>;
}

/// Paints that only change with the style. Rebuilt on `apply_style`.
#[derive(Clone, Debug)]
struct OverlayPaints {
    mask: Paint,
    corner: Paint,
    point_border: Paint,
    point_fill: Paint,
    hint: TextPaint,
}

impl OverlayPaints {
    fn from_style(style: &StyleConfig) -> Self {
        Self {
            mask: Paint::fill(style.mask_color),
            corner: Paint::fill(style.laser_color),
            point_border: Paint::stroke(style.point_border_color, style.result_point_stroke_width),
            point_fill: Paint::fill(style.point_color),
            hint: TextPaint { color: style.hint_text_color, size: style.hint_text_size },
        }
    }
}

pub struct OverlayRenderer {
    style: StyleConfig,
    paints: OverlayPaints,
    clock: AnimationClock,
    scan: ScanPatternRenderer,
    tick: Option<TickHandle>,
    last_frame: Option<FrameRect>,
    detection: Option<DetectionResult>,
}

impl OverlayRenderer {
    pub fn new(style: StyleConfig) -> Self {
        Self {
            paints: OverlayPaints::from_style(&style),
            style,
            clock: AnimationClock::new(),
            scan: ScanPatternRenderer::new(),
            tick: None,
            last_frame: None,
            detection: None,
        }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn detection(&self) -> Option<&DetectionResult> {
        self.detection.as_ref()
    }

    /// Merge style options. Rejected options are logged and returned; the
    /// rest take effect on the next frame.
    pub fn apply_style(&mut self, options: &StyleOptions, host: &mut dyn FrameHost) -> Vec<ValidationIssue> {
        let old_margin = self.style.margin;
        let rejected = self.style.apply(options);
        for issue in &rejected {
            warn!(field = issue.field(), "style option rejected: {issue}");
        }
        // The sweep range depends on the margin.
        if self.style.margin != old_margin {
            self.stop_animation(host);
        }
        self.paints = OverlayPaints::from_style(&self.style);
        host.request_redraw();
        rejected
    }

    pub fn set_detection_result(&mut self, points: Vec<PointF>, scale_factor: f32, host: &mut dyn FrameHost) {
        debug!(points = points.len(), scale_factor, "detection result set");
        self.detection = Some(DetectionResult { points, scale_factor });
        host.request_redraw();
    }

    pub fn clear_detection_result(&mut self, host: &mut dyn FrameHost) {
        if self.detection.take().is_some() {
            host.request_redraw();
        }
    }

    /// Draw one frame. Draws nothing until the camera geometry is known.
    pub fn draw(&mut self, surface: &mut dyn Surface, framing: &dyn FramingSource, host: &mut dyn FrameHost) {
        let (Some(frame), Some(_preview)) = (framing.framing_rect(), framing.framing_rect_in_preview()) else {
            trace!("framing not ready, skipping overlay");
            return;
        };
        self.last_frame = Some(frame);

        self.draw_mask_and_corners(surface, frame);
        self.draw_hint(surface, frame);

        let pos = if self.clock.is_running() {
            self.clock.sample()
        } else {
            frame.top as f32 + self.style.margin as f32
        };
        self.scan.draw(surface, &self.style, frame, pos, self.clock.cycle());

        self.draw_result_point(surface, frame);
        self.ensure_animating(frame, host);
    }

    /// Advance the sweep for our tick registration and ask for a redraw.
    pub fn on_tick(&mut self, id: TickId, host: &mut dyn FrameHost) {
        if self.tick.as_ref().map(TickHandle::id) != Some(id) {
            return;
        }
        self.clock.tick(host.now());

        let scoped = match self.last_frame {
            Some(frame) => host.request_redraw_in(frame),
            None => Err(RedrawError::FrameUnknown),
        };
        if let Err(e) = scoped {
            debug!(error = %e, "scoped redraw failed, falling back to full redraw");
            host.request_redraw();
        }
    }

    /// Stop the sweep and hand the tick registration back. Safe to repeat.
    pub fn teardown(&mut self, host: &mut dyn FrameHost) {
        self.stop_animation(host);
    }

    fn stop_animation(&mut self, host: &mut dyn FrameHost) {
        if let Some(handle) = self.tick.take() {
            host.cancel(handle);
        }
        self.clock.stop();
    }

    fn ensure_animating(&mut self, frame: FrameRect, host: &mut dyn FrameHost) {
        if self.clock.is_running() {
            return;
        }
        // Float math: a huge margin collapses the range instead of overflowing.
        let margin = self.style.margin as f32;
        let now = host.now();
        self.clock.start(frame.top as f32 + margin, frame.bottom as f32 - margin, SWEEP_PERIOD, now);
        if let Some(stale) = self.tick.take() {
            host.cancel(stale);
        }
        self.tick = Some(host.schedule(TICK_INTERVAL));
    }

    fn draw_mask_and_corners(&self, surface: &mut dyn Surface, frame: FrameRect) {
        let (w, h) = surface.size();
        let (w, h) = (w as f32, h as f32);
        let mask = &self.paints.mask;

        if self.style.full_screen {
            surface.fill_rect(RectF::new(0.0, 0.0, w, h), mask);
            return;
        }

        // Edges in f32 so style sizes of any magnitude cannot overflow.
        let (l, t, r, b) = (frame.left as f32, frame.top as f32, frame.right as f32, frame.bottom as f32);
        let rect = RectF::new;
        surface.fill_rect(rect(0.0, 0.0, w, t), mask);
        surface.fill_rect(rect(0.0, t, l, b + 1.0), mask);
        surface.fill_rect(rect(r + 1.0, t, w, b + 1.0), mask);
        surface.fill_rect(rect(0.0, b + 1.0, w, h), mask);

        // Each corner is two bars: `len` long, `th` thick.
        let (len, th) = (self.style.corner_length as f32, self.style.corner_thickness as f32);
        let corner = &self.paints.corner;
        let bars = [
            rect(l, t, l + th, t + len),
            rect(l, t, l + len, t + th),
            rect(r - th, t, r + 1.0, t + len),
            rect(r - len, t, r + 1.0, t + th),
            rect(l, b - len, l + th, b + 1.0),
            rect(l, b - th, l + len, b + 1.0),
            rect(r - th, b - len, r + 1.0, b + 1.0),
            rect(r - len, b - th, r + 1.0, b + 1.0),
        ];
        for bar in bars {
            surface.fill_rect(bar, corner);
        }
    }

    fn draw_hint(&self, surface: &mut dyn Surface, frame: FrameRect) {
        if self.style.hint_text.is_empty() {
            return;
        }
        let center_x = frame.left as f32 + frame.width() as f32 / 2.0;
        let baseline = frame.top as f32 - HINT_GAP;
        surface.draw_text(&self.style.hint_text, center_x, baseline, &self.paints.hint);
    }

    fn draw_result_point(&self, surface: &mut dyn Surface, frame: FrameRect) {
        if !self.style.show_result_point {
            return;
        }
        let Some(detection) = &self.detection else { return };
        let Some(anchor) = anchor_on_surface(&detection.points, frame, self.style.full_screen) else {
            return;
        };

        let radius = self.style.result_point_radius;
        let corners = self.style.result_point_corner_radius;
        let stroke = self.style.result_point_stroke_width;
        let bounds = RectF::around(anchor, radius);
        trace!(?anchor, scale_factor = detection.scale_factor, "result point");
        // Border ring sits on the outside, fill inside it.
        surface.draw_round_rect(bounds.inset(stroke / 2.0), corners, &self.paints.point_border);
        surface.draw_round_rect(bounds.inset(stroke), corners, &self.paints.point_fill);
    }
}
