use common::SessionOptions;
use serde::{Deserialize, Serialize};

/// Options accepted by `start()`. Every field has a default, so an empty
/// object (or `undefined`) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientOptions {
    #[serde(flatten)]
    pub session: SessionOptions,
    #[serde(default = "default_recording_mime_type")]
    pub recording_mime_type: String,
    #[serde(default = "default_snapshot_mime_type")]
    pub snapshot_mime_type: String,
    /// Encoder timeslice. `None` delivers one chunk when recording stops.
    #[serde(default)]
    pub chunk_interval_ms: Option<i32>,
    #[serde(default = "common::default_palette")]
    pub palette: Vec<String>,
    #[serde(default = "default_true")]
    pub initial_audio: bool,
    #[serde(default)]
    pub initial_screen: bool,
}

fn default_recording_mime_type() -> String {
    "video/mp4".to_string()
}

fn default_snapshot_mime_type() -> String {
    "image/jpeg".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            session: SessionOptions::default(),
            recording_mime_type: default_recording_mime_type(),
            snapshot_mime_type: default_snapshot_mime_type(),
            chunk_interval_ms: None,
            palette: common::default_palette(),
            initial_audio: true,
            initial_screen: false,
        }
    }
}

impl ClientOptions {
    /// Palette with the clear swatch always first.
    pub fn swatches(&self) -> Vec<String> {
        let mut swatches = vec!["transparent".to_string()];
        swatches.extend(
            self.palette
                .iter()
                .filter(|css| !css.trim().eq_ignore_ascii_case("transparent"))
                .cloned(),
        );
        swatches
    }
}
