// What you SEE:
// • Live camera is the base image, dimmed outside a centered square.
// • Corner brackets mark the square and a laser sweeps down inside it.
// • L switches laser style (line / grid), F toggles full-screen scanning,
//   H toggles the hint text, C clears the highlight. ESC quits.
// • Left click pretends a code was decoded under the cursor: a rounded marker
//   appears there for a moment.

mod camera;
mod canvas;
mod clock;
mod draw;
mod error;
mod font;
mod geometry;
mod overlay;
mod paint;
mod scan;
mod scheduler;
mod style;
mod types;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use camera::{CameraCapture, CameraFraming};
use clap::Parser;
use draw::{Drawer, WindowHost};
use error::Error;
use minifb::Key;
use overlay::{FramingSource, OverlayRenderer};
use style::{LaserStyle, StyleConfig, StyleOptions};
use tracing::{debug, info, trace};
use types::PointF;

/// How long an injected detection stays highlighted.
const DETECTION_TTL: Duration = Duration::from_millis(1500);
/// Half-size of the fake finder-pattern triangle.
const FAKE_CODE_HALF: f32 = 20.0;

#[derive(Parser, Debug)]
#[command(version, about = "Barcode viewfinder overlay on a live camera preview")]
struct Cli {
    /// Camera device index
    #[arg(long, default_value_t = 0)]
    camera: u32,

    /// Requested capture width
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Requested capture height
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// JSON file with style options
    #[arg(long)]
    style: Option<PathBuf>,

    /// Scan indicator style, overrides the style file
    #[arg(long, value_enum)]
    laser_style: Option<LaserStyle>,

    /// Dim the whole preview and scan everywhere
    #[arg(long)]
    full_screen: bool,
}

fn setup_logging() {
    use tracing_subscriber::prelude::*;

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_level(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,scan_overlay=debug"));

    tracing_subscriber::registry().with(filter).with(stdout_layer).init();
}

fn load_style_options(path: &Path) -> Result<StyleOptions, Error> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Three finder-pattern-like points around (cx, cy), preview-relative.
fn fake_detection(cx: f32, cy: f32) -> Vec<PointF> {
    let s = FAKE_CODE_HALF;
    vec![PointF::new(cx - s, cy + s), PointF::new(cx - s, cy - s), PointF::new(cx + s, cy - s)]
}

fn main() -> Result<(), Error> {
    setup_logging();
    let cli = Cli::parse();

    /* --- Camera + window setup --- */
    let mut cam = CameraCapture::new(cli.camera, cli.width, cli.height)?;
    let (w, h) = cam.resolution();
    let (w, h) = (w as usize, h as usize);
    let mut drawer = Drawer::new("Scan Overlay", w, h)?;

    /* --- Overlay and the services it schedules against --- */
    let mut host = WindowHost::new(w, h);
    let mut framing = CameraFraming::new();
    let mut overlay = OverlayRenderer::new(StyleConfig::default());

    if let Some(path) = &cli.style {
        let options = load_style_options(path)?;
        info!(path = %path.display(), "style file loaded");
        overlay.apply_style(&options, &mut host);
    }
    let overrides = StyleOptions {
        laser_style: cli.laser_style,
        full_screen: cli.full_screen.then_some(true),
        ..Default::default()
    };
    overlay.apply_style(&overrides, &mut host);

    let mut saved_hint = overlay.style().hint_text.clone();
    let mut was_clicking = false;
    let mut detected_at: Option<Instant> = None;

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Fresh live frame; it becomes the screen we draw on. */
        let mut screen = cam.next_frame()?;
        // The overlay draws straight onto the preview, so both sizes match.
        let size = (screen.width, screen.height);
        framing.configure(size, size);

        /* 2) Tick registrations that came due advance the laser. */
        for id in host.due() {
            overlay.on_tick(id, &mut host);
        }

        /* 3) Inputs */
        if drawer.pressed_once(Key::L) {
            let next = match overlay.style().laser_style {
                LaserStyle::Line => LaserStyle::Grid,
                LaserStyle::Grid => LaserStyle::Line,
            };
            overlay.apply_style(&StyleOptions { laser_style: Some(next), ..Default::default() }, &mut host);
        }
        if drawer.pressed_once(Key::F) {
            let full = !overlay.style().full_screen;
            overlay.apply_style(&StyleOptions { full_screen: Some(full), ..Default::default() }, &mut host);
        }
        if drawer.pressed_once(Key::H) {
            let hint = if overlay.style().hint_text.is_empty() {
                saved_hint.clone()
            } else {
                saved_hint = overlay.style().hint_text.clone();
                String::new()
            };
            overlay.apply_style(&StyleOptions { hint_text: Some(hint), ..Default::default() }, &mut host);
        }
        if drawer.pressed_once(Key::C) {
            overlay.clear_detection_result(&mut host);
            detected_at = None;
        }

        let clicking = drawer.left_mouse_down();
        if clicking && !was_clicking {
            if let (Some((mx, my)), Some(frame)) = (drawer.mouse_pos(), framing.framing_rect()) {
                // Decoded points are relative to the preview region.
                let (cx, cy) = if overlay.style().full_screen {
                    (mx, my)
                } else {
                    (mx - frame.left as f32, my - frame.top as f32)
                };
                overlay.set_detection_result(fake_detection(cx, cy), 1.0, &mut host);
                detected_at = Some(Instant::now());
            }
        }
        was_clicking = clicking;

        if detected_at.is_some_and(|t| t.elapsed() >= DETECTION_TTL) {
            overlay.clear_detection_result(&mut host);
            detected_at = None;
        }

        /* 4) The camera changes every frame, so the whole overlay is redrawn
              regardless of what was requested. */
        if let Some(repaint) = host.take_repaint() {
            trace!(?repaint, "repaint");
        }
        overlay.draw(&mut screen, &framing, &mut host);

        /* 5) Present to the window. */
        drawer.present(&screen)?;

        /* 6) FPS once per second */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            debug!(fps = %format!("{:.1}", frames_this_second as f32 / secs), "frame rate");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    overlay.teardown(&mut host);
    debug!(active_ticks = host.active_ticks(), "overlay torn down");
    Ok(())
}
