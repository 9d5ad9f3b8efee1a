// Window, input, and the host services the overlay schedules against.
// Visual effects provided here:
// 1) A window that shows the camera image with the overlay on top.
// 2) Key toggles for the overlay style and a mouse click that fakes a detection.

use std::time::{Duration, Instant};

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use tracing::trace;

use crate::error::Error;
use crate::overlay::{FrameHost, RedrawError};
use crate::scheduler::{FrameTicker, TickHandle, TickId};
use crate::types::{FrameBuffer, FrameRect};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Mouse position in window pixels; None when outside the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    pub fn pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }
}

/// What the overlay last asked the window to repaint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repaint {
    Everything,
    Region(FrameRect),
}

/// `FrameHost` for the window loop: owns the tick registrations and collects
/// redraw requests until the loop takes them.
pub struct WindowHost {
    ticker: FrameTicker,
    size: (i32, i32),
    pending: Option<Repaint>,
}

impl WindowHost {
    pub fn new(width: usize, height: usize) -> Self {
        Self { ticker: FrameTicker::new(), size: (width as i32, height as i32), pending: None }
    }

    /// Tick registrations due right now.
    pub fn due(&mut self) -> Vec<TickId> {
        self.ticker.due(Instant::now())
    }

    /// Take the coalesced repaint request, if any.
    pub fn take_repaint(&mut self) -> Option<Repaint> {
        self.pending.take()
    }

    pub fn active_ticks(&self) -> usize {
        self.ticker.active()
    }
}

impl FrameHost for WindowHost {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn schedule(&mut self, interval: Duration) -> TickHandle {
        self.ticker.register(interval, Instant::now())
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.ticker.cancel(handle);
    }

    fn request_redraw(&mut self) {
        self.pending = Some(Repaint::Everything);
    }

    fn request_redraw_in(&mut self, bounds: FrameRect) -> Result<(), RedrawError> {
        let (w, h) = self.size;
        if bounds.is_empty() || bounds.left < 0 || bounds.top < 0 || bounds.right > w || bounds.bottom > h {
            return Err(RedrawError::OutOfBounds(bounds));
        }
        // Coalesce: anything wider than a region stays wide.
        self.pending = match self.pending {
            Some(Repaint::Everything) => Some(Repaint::Everything),
            Some(Repaint::Region(r)) if r != bounds => Some(Repaint::Everything),
            _ => Some(Repaint::Region(bounds)),
        };
        trace!(?bounds, "scoped repaint requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_requests_outside_window_fail() {
        let mut host = WindowHost::new(100, 100);
        let err = host.request_redraw_in(FrameRect::new(50, 50, 150, 90));
        assert_eq!(err, Err(RedrawError::OutOfBounds(FrameRect::new(50, 50, 150, 90))));
        assert_eq!(host.take_repaint(), None);
    }

    #[test]
    fn repaint_requests_coalesce() {
        let mut host = WindowHost::new(100, 100);
        let r = FrameRect::new(10, 10, 60, 60);
        host.request_redraw_in(r).expect("in bounds");
        host.request_redraw_in(r).expect("in bounds");
        assert_eq!(host.take_repaint(), Some(Repaint::Region(r)));

        host.request_redraw_in(r).expect("in bounds");
        host.request_redraw();
        host.request_redraw_in(r).expect("in bounds");
        assert_eq!(host.take_repaint(), Some(Repaint::Everything));
        assert_eq!(host.take_repaint(), None);
    }

    #[test]
    fn schedule_and_cancel_track_registrations() {
        let mut host = WindowHost::new(10, 10);
        let handle = host.schedule(Duration::from_millis(16));
        assert_eq!(host.active_ticks(), 1);
        host.cancel(handle);
        assert_eq!(host.active_ticks(), 0);
    }
}
