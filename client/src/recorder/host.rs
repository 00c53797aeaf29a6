use common::{CaptureError, GalleryEntry, MediaHost, Rgba};
use gloo_timers::callback::{Interval, Timeout};
use web_sys::{Blob, MediaStream};

use crate::recorder::canvas_renderer::capture_snapshot;
use crate::recorder::downloads;
use crate::recorder::media_recorder::{self, Recorder};
use crate::recorder::media_streams;
use crate::recorder::state;
use crate::recorder::types::ClientOptions;
use crate::recorder::ui::UiController;
use crate::recorder::utils::{current_timestamp_ms, encoder_error, snapshot_error};

const CAPTURE_FLASH_MS: u32 = 500;
const TICK_MS: u32 = 1000;

/// Browser implementation of the session's platform side.
pub struct BrowserHost {
    ui: UiController,
    options: ClientOptions,
    screen_supported: bool,
    encoder: Option<Recorder>,
    ticker: Option<Interval>,
}

impl BrowserHost {
    pub fn new(ui: UiController, options: ClientOptions) -> Self {
        Self {
            ui,
            options,
            screen_supported: media_streams::screen_capture_supported(),
            encoder: None,
            ticker: None,
        }
    }
}

impl MediaHost for BrowserHost {
    type Stream = MediaStream;
    type Chunk = Blob;

    fn screen_capture_supported(&self) -> bool {
        self.screen_supported
    }

    fn release_stream(&mut self, stream: &MediaStream) {
        media_streams::stop_stream(stream);
    }

    fn bind_preview(&mut self, stream: Option<&MediaStream>) {
        self.ui.bind_preview(stream);
    }

    fn create_encoder(&mut self, stream: &MediaStream, generation: u64) -> Result<(), CaptureError> {
        // Drop the previous encoder first so its handlers are detached.
        self.encoder = None;
        let recorder = Recorder::new(
            stream,
            generation,
            &self.options.recording_mime_type,
            self.options.chunk_interval_ms,
        )
        .map_err(encoder_error)?;
        self.encoder = Some(recorder);
        Ok(())
    }

    fn start_encoder(&mut self) -> Result<(), CaptureError> {
        let encoder = self
            .encoder
            .as_ref()
            .ok_or_else(|| CaptureError::Encoder("No encoder for the current stream".to_string()))?;
        encoder.start().map_err(encoder_error)
    }

    fn stop_encoder(&mut self) -> Result<(), CaptureError> {
        let encoder = self
            .encoder
            .as_ref()
            .ok_or_else(|| CaptureError::Encoder("No encoder for the current stream".to_string()))?;
        encoder.stop().map_err(encoder_error)
    }

    fn assemble_recording(&mut self, chunks: Vec<Blob>) -> Result<String, CaptureError> {
        let blob = media_recorder::assemble(&chunks, &self.options.recording_mime_type)
            .map_err(encoder_error)?;
        log::info!("[Recorder] Recording assembled ({} bytes)", blob.size());
        downloads::object_url(&blob).map_err(encoder_error)
    }

    fn capture_frame(&mut self, overlay: Rgba) -> Result<Option<String>, CaptureError> {
        capture_snapshot(&self.ui.video, overlay, &self.options.snapshot_mime_type).map_err(snapshot_error)
    }

    fn save_to_disk(&mut self, url: &str, filename: &str) {
        if let Err(e) = downloads::save_to_disk(url, filename) {
            log::warn!("[Gallery] Download of {} failed: {:?}", filename, e);
        }
    }

    fn open_preview(&mut self, url: &str) {
        if let Err(e) = downloads::open_in_new_tab(url) {
            log::warn!("[Gallery] Preview failed: {:?}", e);
        }
    }

    fn now_ms(&self) -> f64 {
        current_timestamp_ms()
    }

    fn set_status(&mut self, text: &str, is_error: bool) {
        self.ui.set_permission_message(text, is_error);
    }

    fn set_recording_indicator(&mut self, recording: bool) {
        self.ui.set_recording(recording);
    }

    fn start_ticker(&mut self) {
        self.ticker = Some(Interval::new(TICK_MS, || {
            state::with_session(|session| session.tick());
        }));
    }

    fn stop_ticker(&mut self) {
        // Dropping the interval cancels it.
        self.ticker = None;
    }

    fn render_timer(&mut self, text: &str, visible: bool) {
        self.ui.render_timer(text, visible);
    }

    fn set_overlay_preview(&mut self, css: &str) {
        self.ui.set_overlay(css);
    }

    fn render_gallery(&mut self, entries: &[GalleryEntry]) {
        if let Err(e) = self.ui.render_gallery(entries) {
            log::warn!("[Gallery] Render failed: {:?}", e);
        }
    }

    fn flash_capture(&mut self) {
        self.ui.set_capture_flash(true);
        let ui = self.ui.clone();
        Timeout::new(CAPTURE_FLASH_MS, move || ui.set_capture_flash(false)).forget();
    }
}
