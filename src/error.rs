// Host-side errors. Every variant states *where* things went wrong.
// The overlay itself never fails; only window, camera and file paths do.

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),

    #[error("camera init error: {0}")]
    CameraInit(String),

    #[error("camera frame error: {0}")]
    CameraFrame(String),

    #[error("failed to read style file: {0}")]
    StyleRead(#[from] std::io::Error),

    #[error("failed to parse style file: {0}")]
    StyleParse(#[from] serde_json::Error),
}
