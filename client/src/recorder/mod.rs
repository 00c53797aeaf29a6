//! Capture subsystem: live preview, recording, snapshots and the session gallery

pub mod types;
pub mod utils;
pub mod canvas_renderer;
pub mod media_streams;
pub mod media_recorder;
pub mod downloads;
pub mod host;
pub mod state;
pub mod ui;

// Re-export main entry points
pub use host::BrowserHost;
pub use types::ClientOptions;
pub use ui::UiController;
