use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Media access failed: {0}")]
    MediaAccess(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Snapshot failed: {0}")]
    Snapshot(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

impl CaptureError {
    /// Message shown on the status line when acquisition fails.
    pub fn status_text(&self) -> &'static str {
        match self {
            CaptureError::UnsupportedPlatform(_) => "Media devices API not supported in this browser",
            CaptureError::MediaAccess(_) => "Permission denied or no media devices found",
            CaptureError::Encoder(_) => "Recording failed",
            CaptureError::Snapshot(_) => "Snapshot failed",
            CaptureError::InvalidColor(_) => "Invalid filter color",
        }
    }
}
