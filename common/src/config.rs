use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamSource {
    Camera,
    Screen,
}

impl StreamSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamSource::Camera => "camera",
            StreamSource::Screen => "screen",
        }
    }

    /// Status line shown once a stream from this source is live.
    pub fn ready_message(&self) -> &'static str {
        match self {
            StreamSource::Camera => "Camera preview ready",
            StreamSource::Screen => "Screen sharing active",
        }
    }
}

/// Constraints handed to `getUserMedia` / `getDisplayMedia`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

/// Latest stream request, derived from the screen-mode and audio toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    pub video: bool,
    pub audio: bool,
    pub source: StreamSource,
}

impl StreamConfig {
    pub fn from_toggles(screen_mode: bool, audio: bool) -> Self {
        Self {
            video: true,
            audio,
            source: if screen_mode { StreamSource::Screen } else { StreamSource::Camera },
        }
    }

    pub fn set_screen_mode(&mut self, screen_mode: bool) {
        self.source = if screen_mode { StreamSource::Screen } else { StreamSource::Camera };
    }

    pub fn set_audio(&mut self, audio: bool) {
        self.audio = audio;
    }

    pub fn constraints(&self) -> MediaConstraints {
        MediaConstraints {
            video: self.video,
            audio: self.audio,
        }
    }

    /// Source actually requested: screen capture falls back to the camera
    /// when the platform has no display capture.
    pub fn effective_source(&self, screen_supported: bool) -> StreamSource {
        match self.source {
            StreamSource::Screen if screen_supported => StreamSource::Screen,
            _ => StreamSource::Camera,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::from_toggles(false, true)
    }
}

/// Effects applied to every produced artifact, plus fixed artifact names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    #[serde(default = "default_true")]
    pub auto_download: bool,
    #[serde(default = "default_true")]
    pub keep_in_gallery: bool,
    #[serde(default = "default_recording_filename")]
    pub recording_filename: String,
    #[serde(default = "default_snapshot_filename")]
    pub snapshot_filename: String,
}

fn default_true() -> bool {
    true
}

fn default_recording_filename() -> String {
    "video.mp4".to_string()
}

fn default_snapshot_filename() -> String {
    "image.jpg".to_string()
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            auto_download: true,
            keep_in_gallery: true,
            recording_filename: default_recording_filename(),
            snapshot_filename: default_snapshot_filename(),
        }
    }
}
