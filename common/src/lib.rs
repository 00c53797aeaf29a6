//! Platform-independent core of the capture session: stream configuration,
//! recording buffer, timer, overlay filters, gallery, and the session context
//! that ties them together behind the `MediaHost` trait.

pub mod config;
pub mod error;
pub mod filter;
pub mod gallery;
pub mod raster;
pub mod recording;
pub mod session;
pub mod timer;

pub use config::*;
pub use error::CaptureError;
pub use filter::{default_palette, FilterColor, Rgba};
pub use gallery::*;
pub use recording::{RecordingSession, RecordingState};
pub use session::{AcquireRequest, CaptureSession, MediaHost};
pub use timer::{format_hms, RecordingTimer};
