// Opens the default camera and converts frames into a buffer suitable for the window.
// Also decides where the framing rectangle sits once frames start arriving.
// Visual expectation: the live picture fills the window and a centered square
// marks where the code should go.

use crate::error::Error;
use crate::overlay::FramingSource;
use crate::types::{FrameBuffer, FrameRect};

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use image::{ImageBuffer, Rgb};
use tracing::info;

const MIN_FRAME_WIDTH: i32 = 240;
const MIN_FRAME_HEIGHT: i32 = 240;
const MAX_FRAME_WIDTH: i32 = 1200;
const MAX_FRAME_HEIGHT: i32 = 675;

// A small wrapper around nokhwa::Camera so our main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Try to open camera `index` at a target resolution (falls back if not exact).
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        info!(width = actual.width(), height = actual.height(), "camera stream open");

        Ok(Self { cam, width: actual.width(), height: actual.height() })
    }

    /// Grab one frame and convert it to 0x00RRGGBB pixels.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let rgb_img: ImageBuffer<Rgb<u8>, Vec<u8>> = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb_img.dimensions();
        let pixels = rgb_img
            .pixels()
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect();

        Ok(FrameBuffer { width: w as usize, height: h as usize, pixels })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Framing geometry for a screen showing a camera preview.
/// Both rectangles are `None` until `configure` has seen real sizes.
#[derive(Debug, Default)]
pub struct CameraFraming {
    screen: Option<(i32, i32)>,
    camera: Option<(i32, i32)>,
}

impl CameraFraming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the window size and the size of frames the camera delivers.
    pub fn configure(&mut self, screen: (usize, usize), camera: (usize, usize)) {
        let screen = (screen.0 as i32, screen.1 as i32);
        let camera = (camera.0 as i32, camera.1 as i32);
        if self.screen != Some(screen) || self.camera != Some(camera) {
            info!(?screen, ?camera, "framing configured");
        }
        self.screen = Some(screen);
        self.camera = Some(camera);
    }
}

/// 5/8 of the screen dimension, kept within [min, max] and the screen itself.
fn desired_dimension(resolution: i32, min: i32, max: i32) -> i32 {
    let dim = 5 * resolution / 8;
    dim.clamp(min, max).min(resolution)
}

impl FramingSource for CameraFraming {
    fn framing_rect(&self) -> Option<FrameRect> {
        let (w, h) = self.screen?;
        if w <= 0 || h <= 0 {
            return None;
        }
        let side = desired_dimension(w, MIN_FRAME_WIDTH, MAX_FRAME_WIDTH)
            .min(desired_dimension(h, MIN_FRAME_HEIGHT, MAX_FRAME_HEIGHT));
        let left = (w - side) / 2;
        let top = (h - side) / 2;
        Some(FrameRect::new(left, top, left + side, top + side))
    }

    fn framing_rect_in_preview(&self) -> Option<FrameRect> {
        let frame = self.framing_rect()?;
        let (sw, sh) = self.screen?;
        let (cw, ch) = self.camera?;
        Some(FrameRect::new(
            frame.left * cw / sw,
            frame.top * ch / sh,
            frame.right * cw / sw,
            frame.bottom * ch / sh,
        ))
    }
}
