//! Capture session context.
//!
//! One `CaptureSession` owns the live stream, its recording session, the
//! timer, the current filter and the gallery. Platform events are dispatched
//! into it as method calls; it drives the platform back through `MediaHost`.
//!
//! Stream acquisition is asynchronous on every platform we target, so it is
//! split in two: `request_stream` (and the toggle setters) release the old
//! stream and hand out an `AcquireRequest` tagged with a fresh generation,
//! and the platform reports the outcome with `complete_acquire`. Completions
//! for any generation but the latest are released and discarded.

use crate::config::{MediaConstraints, SessionOptions, StreamConfig, StreamSource};
use crate::error::CaptureError;
use crate::filter::{FilterColor, Rgba};
use crate::gallery::{ArtifactKind, Gallery, GalleryEntry};
use crate::recording::RecordingSession;
use crate::timer::RecordingTimer;

/// Platform side of a capture session.
pub trait MediaHost {
    /// Live stream handle. Cloning must not duplicate the underlying device.
    type Stream: Clone;
    /// One unit of encoded recording data.
    type Chunk;

    fn screen_capture_supported(&self) -> bool;

    /// Stop every track of `stream`.
    fn release_stream(&mut self, stream: &Self::Stream);

    /// Show `stream` on the preview surface (or clear it with `None`).
    fn bind_preview(&mut self, stream: Option<&Self::Stream>);

    /// Build the encoder for `stream`. Chunks and the stop event it produces
    /// must be reported with `generation`.
    fn create_encoder(&mut self, stream: &Self::Stream, generation: u64) -> Result<(), CaptureError>;

    fn start_encoder(&mut self) -> Result<(), CaptureError>;

    fn stop_encoder(&mut self) -> Result<(), CaptureError>;

    /// Join `chunks` in order into one playable video and return a URL for it.
    fn assemble_recording(&mut self, chunks: Vec<Self::Chunk>) -> Result<String, CaptureError>;

    /// Draw the current frame, composite `overlay` over it and return an
    /// image URL. `Ok(None)` when no frame is available yet.
    fn capture_frame(&mut self, overlay: Rgba) -> Result<Option<String>, CaptureError>;

    fn save_to_disk(&mut self, url: &str, filename: &str);

    fn open_preview(&mut self, url: &str);

    fn now_ms(&self) -> f64;

    fn set_status(&mut self, text: &str, is_error: bool);

    fn set_recording_indicator(&mut self, recording: bool);

    fn start_ticker(&mut self);

    fn stop_ticker(&mut self);

    fn render_timer(&mut self, text: &str, visible: bool);

    fn set_overlay_preview(&mut self, css: &str);

    fn render_gallery(&mut self, entries: &[GalleryEntry]);

    /// Short cosmetic animation on the capture control.
    fn flash_capture(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireRequest {
    pub generation: u64,
    pub source: StreamSource,
    pub constraints: MediaConstraints,
}

struct ActiveStream<S> {
    handle: S,
    generation: u64,
}

pub struct CaptureSession<H: MediaHost> {
    host: H,
    config: StreamConfig,
    options: SessionOptions,
    generation: u64,
    pending_source: Option<StreamSource>,
    stream: Option<ActiveStream<H::Stream>>,
    recorder: Option<RecordingSession<H::Chunk>>,
    record_flag: bool,
    timer: RecordingTimer,
    filter: FilterColor,
    gallery: Gallery,
}

impl<H: MediaHost> CaptureSession<H> {
    pub fn new(host: H, config: StreamConfig, options: SessionOptions) -> Self {
        let gallery = Gallery::new(
            options.recording_filename.clone(),
            options.snapshot_filename.clone(),
        );
        Self {
            host,
            config,
            options,
            generation: 0,
            pending_source: None,
            stream: None,
            recorder: None,
            record_flag: false,
            timer: RecordingTimer::new(),
            filter: FilterColor::transparent(),
            gallery,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> StreamConfig {
        self.config
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stream(&self) -> Option<&H::Stream> {
        self.stream.as_ref().map(|s| &s.handle)
    }

    /// True from the record toggle until the encoder has been drained.
    pub fn is_recording(&self) -> bool {
        self.record_flag || self.recorder.as_ref().is_some_and(|r| r.is_recording())
    }

    pub fn buffered_chunks(&self) -> usize {
        self.recorder.as_ref().map_or(0, |r| r.buffered_chunks())
    }

    pub fn timer(&self) -> &RecordingTimer {
        &self.timer
    }

    pub fn filter(&self) -> &FilterColor {
        &self.filter
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    // ---- Stream provider ----

    /// Release the current stream and ask for a new one matching the current
    /// config. Returns `None` while a recording is in progress.
    pub fn request_stream(&mut self) -> Option<AcquireRequest> {
        if self.is_recording() {
            log::warn!("[Stream] Ignoring reconfiguration while recording");
            return None;
        }

        self.release_current();

        self.generation += 1;
        let source = self.config.effective_source(self.host.screen_capture_supported());
        if source != self.config.source {
            log::info!("[Stream] Screen capture unavailable, falling back to camera");
        }
        self.pending_source = Some(source);

        let request = AcquireRequest {
            generation: self.generation,
            source,
            constraints: self.config.constraints(),
        };
        log::info!(
            "[Stream] Requesting {} stream (generation {}, audio {})",
            source.as_str(),
            request.generation,
            request.constraints.audio
        );
        Some(request)
    }

    pub fn set_screen_mode(&mut self, screen_mode: bool) -> Option<AcquireRequest> {
        if self.is_recording() {
            log::warn!("[Stream] Screen mode change ignored while recording");
            return None;
        }
        self.config.set_screen_mode(screen_mode);
        self.request_stream()
    }

    pub fn set_audio(&mut self, audio: bool) -> Option<AcquireRequest> {
        if self.is_recording() {
            log::warn!("[Stream] Audio change ignored while recording");
            return None;
        }
        self.config.set_audio(audio);
        self.request_stream()
    }

    /// Report the outcome of an acquisition. Returns true when the stream
    /// became the active one.
    pub fn complete_acquire(
        &mut self,
        generation: u64,
        result: Result<H::Stream, CaptureError>,
    ) -> bool {
        if generation != self.generation {
            match result {
                Ok(stale) => {
                    log::info!(
                        "[Stream] Releasing stale stream (generation {}, latest {})",
                        generation,
                        self.generation
                    );
                    self.host.release_stream(&stale);
                }
                Err(e) => log::debug!("[Stream] Stale acquisition failed: {}", e),
            }
            return false;
        }

        let source = self.pending_source.take().unwrap_or(self.config.source);
        let stream = match result {
            Ok(stream) => stream,
            Err(e) => {
                log::error!("[Stream] Acquisition failed: {}", e);
                self.host.set_status(e.status_text(), true);
                return false;
            }
        };

        self.host.bind_preview(Some(&stream));
        match self.host.create_encoder(&stream, generation) {
            Ok(()) => self.recorder = Some(RecordingSession::new(generation)),
            Err(e) => {
                log::warn!("[Recorder] Recording unavailable for this stream: {}", e);
                self.recorder = None;
            }
        }
        self.stream = Some(ActiveStream { handle: stream, generation });
        self.host.set_status(source.ready_message(), false);
        log::info!("[Stream] {} (generation {})", source.ready_message(), generation);
        true
    }

    /// The live source ended on its own, e.g. screen sharing stopped from
    /// the browser UI.
    pub fn stream_ended(&mut self, generation: u64) {
        let current = self.stream.as_ref().map(|s| s.generation);
        if current != Some(generation) {
            return;
        }
        log::info!("[Stream] Stream ended (generation {})", generation);

        if self.record_flag {
            self.end_record_toggle();
        }
        if let Some(active) = self.stream.take() {
            self.host.release_stream(&active.handle);
        }
        self.host.bind_preview(None);
        if !self.recorder.as_ref().is_some_and(|r| r.is_recording()) {
            self.recorder = None;
        }
        self.host.set_status("Stream ended", true);
    }

    fn release_current(&mut self) {
        if let Some(active) = self.stream.take() {
            log::debug!("[Stream] Releasing stream (generation {})", active.generation);
            self.host.release_stream(&active.handle);
            self.host.bind_preview(None);
        }
        self.recorder = None;
    }

    // ---- Recorder controller ----

    pub fn toggle_record(&mut self) {
        if self.stream.is_none() || self.recorder.is_none() {
            return;
        }
        if self.record_flag {
            self.end_record_toggle();
        } else {
            self.start_recording();
        }
    }

    fn start_recording(&mut self) {
        let Some(recorder) = self.recorder.as_mut() else {
            return;
        };
        if recorder.is_recording() {
            log::debug!("[Recorder] Previous recording still draining");
            return;
        }

        recorder.begin();
        if let Err(e) = self.host.start_encoder() {
            log::error!("[Recorder] Failed to start: {}", e);
            recorder.drain();
            self.host.set_status(e.status_text(), true);
            return;
        }

        self.record_flag = true;
        self.timer.start();
        self.host.set_recording_indicator(true);
        self.host.render_timer(&self.timer.display(), true);
        self.host.start_ticker();
        log::info!("[Recorder] Recording started");
    }

    /// Flip the toggle off and ask the encoder to stop. The buffer is drained
    /// when the encoder reports it has stopped.
    fn end_record_toggle(&mut self) {
        self.record_flag = false;
        self.timer.stop();
        self.host.stop_ticker();
        self.host.render_timer(&self.timer.display(), false);

        let generation = self.recorder.as_ref().map(|r| r.stream_generation());
        if let Err(e) = self.host.stop_encoder() {
            log::warn!("[Recorder] Encoder stop failed, finalizing with buffered data: {}", e);
            if let Some(generation) = generation {
                self.encoder_stopped(generation);
            }
        }
    }

    pub fn push_chunk(&mut self, generation: u64, chunk: H::Chunk) {
        match self.recorder.as_mut() {
            Some(recorder) if recorder.stream_generation() == generation => {
                if !recorder.push(chunk) {
                    log::debug!("[Recorder] Dropping chunk delivered while idle");
                }
            }
            _ => log::debug!("[Recorder] Dropping chunk for generation {}", generation),
        }
    }

    /// Encoder finished: assemble the buffered chunks into one artifact.
    pub fn encoder_stopped(&mut self, generation: u64) {
        let chunks = match self.recorder.as_mut() {
            Some(recorder) if recorder.stream_generation() == generation => recorder.drain(),
            _ => None,
        };
        let Some(chunks) = chunks else {
            return;
        };

        if self.record_flag {
            // Encoder stopped without the toggle (e.g. track ended).
            self.record_flag = false;
            self.timer.stop();
            self.host.stop_ticker();
            self.host.render_timer(&self.timer.display(), false);
        }

        log::info!("[Recorder] Assembling {} chunks", chunks.len());
        match self.host.assemble_recording(chunks) {
            Ok(url) => self.publish_artifact(url, ArtifactKind::Recording),
            Err(e) => {
                log::error!("[Recorder] Failed to assemble recording: {}", e);
                self.host.set_status(e.status_text(), true);
            }
        }
        self.host.set_recording_indicator(false);

        if self.stream.is_none() {
            self.recorder = None;
        }
    }

    // ---- Timer ----

    pub fn tick(&mut self) {
        if self.timer.tick() {
            self.host.render_timer(&self.timer.display(), true);
        }
    }

    // ---- Capture controller ----

    pub fn take_snapshot(&mut self) {
        if self.stream.is_none() {
            return;
        }
        self.host.flash_capture();
        match self.host.capture_frame(self.filter.rgba()) {
            Ok(Some(url)) => self.publish_artifact(url, ArtifactKind::Snapshot),
            Ok(None) => log::debug!("[Capture] No frame available yet"),
            Err(e) => log::warn!("[Capture] {}", e),
        }
    }

    // ---- Filter selector ----

    pub fn select_filter(&mut self, css: &str) -> Result<(), CaptureError> {
        let color = FilterColor::parse(css).map_err(|e| {
            log::warn!("[Filter] Keeping {}: {}", self.filter.css(), e);
            e
        })?;
        self.host.set_overlay_preview(color.css());
        self.filter = color;
        Ok(())
    }

    // ---- Gallery ----

    fn publish_artifact(&mut self, url: String, kind: ArtifactKind) {
        if self.options.auto_download {
            self.host.save_to_disk(&url, self.gallery.download_name(kind));
        }
        if self.options.keep_in_gallery {
            let timestamp = self.host.now_ms();
            self.gallery.add_item(url, kind, timestamp);
            let entries = self.gallery.render();
            self.host.render_gallery(&entries);
        }
    }

    pub fn preview_item(&mut self, id: u64) {
        if let Some(item) = self.gallery.get(id) {
            let url = item.url.clone();
            self.host.open_preview(&url);
        }
    }

    pub fn download_item(&mut self, id: u64) {
        if let Some(item) = self.gallery.get(id) {
            let url = item.url.clone();
            let filename = self.gallery.download_name(item.kind).to_string();
            self.host.save_to_disk(&url, &filename);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Release(u32),
        Preview(Option<u32>),
        CreateEncoder(u32, u64),
        StartEncoder,
        StopEncoder,
        Assemble(Vec<String>),
        Capture(Rgba),
        Save(String, String),
        Open(String),
        Status(String, bool),
        Indicator(bool),
        StartTicker,
        StopTicker,
        Timer(String, bool),
        Overlay(String),
        Gallery(Vec<u64>),
        Flash,
    }

    #[derive(Default)]
    struct FakeHost {
        calls: Vec<Call>,
        live: BTreeSet<u32>,
        bound: Option<u32>,
        screen_supported: bool,
        fail_encoder: bool,
        snapshots: u32,
        recordings: u32,
    }

    impl FakeHost {
        fn new() -> Self {
            Self {
                screen_supported: true,
                ..Default::default()
            }
        }

        // Simulates the device granting a stream.
        fn grant(&mut self, id: u32) -> u32 {
            self.live.insert(id);
            id
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    impl MediaHost for FakeHost {
        type Stream = u32;
        type Chunk = String;

        fn screen_capture_supported(&self) -> bool {
            self.screen_supported
        }

        fn release_stream(&mut self, stream: &u32) {
            self.live.remove(stream);
            self.calls.push(Call::Release(*stream));
        }

        fn bind_preview(&mut self, stream: Option<&u32>) {
            self.bound = stream.copied();
            self.calls.push(Call::Preview(stream.copied()));
        }

        fn create_encoder(&mut self, stream: &u32, generation: u64) -> Result<(), CaptureError> {
            self.calls.push(Call::CreateEncoder(*stream, generation));
            if self.fail_encoder {
                return Err(CaptureError::Encoder("unsupported".to_string()));
            }
            Ok(())
        }

        fn start_encoder(&mut self) -> Result<(), CaptureError> {
            self.calls.push(Call::StartEncoder);
            Ok(())
        }

        fn stop_encoder(&mut self) -> Result<(), CaptureError> {
            self.calls.push(Call::StopEncoder);
            Ok(())
        }

        fn assemble_recording(&mut self, chunks: Vec<String>) -> Result<String, CaptureError> {
            self.recordings += 1;
            self.calls.push(Call::Assemble(chunks));
            Ok(format!("blob:recording-{}", self.recordings))
        }

        fn capture_frame(&mut self, overlay: Rgba) -> Result<Option<String>, CaptureError> {
            self.snapshots += 1;
            self.calls.push(Call::Capture(overlay));
            Ok(Some(format!("data:snapshot-{}", self.snapshots)))
        }

        fn save_to_disk(&mut self, url: &str, filename: &str) {
            self.calls.push(Call::Save(url.to_string(), filename.to_string()));
        }

        fn open_preview(&mut self, url: &str) {
            self.calls.push(Call::Open(url.to_string()));
        }

        fn now_ms(&self) -> f64 {
            1_700_000_000_000.0
        }

        fn set_status(&mut self, text: &str, is_error: bool) {
            self.calls.push(Call::Status(text.to_string(), is_error));
        }

        fn set_recording_indicator(&mut self, recording: bool) {
            self.calls.push(Call::Indicator(recording));
        }

        fn start_ticker(&mut self) {
            self.calls.push(Call::StartTicker);
        }

        fn stop_ticker(&mut self) {
            self.calls.push(Call::StopTicker);
        }

        fn render_timer(&mut self, text: &str, visible: bool) {
            self.calls.push(Call::Timer(text.to_string(), visible));
        }

        fn set_overlay_preview(&mut self, css: &str) {
            self.calls.push(Call::Overlay(css.to_string()));
        }

        fn render_gallery(&mut self, entries: &[GalleryEntry]) {
            self.calls.push(Call::Gallery(entries.iter().map(|e| e.id).collect()));
        }

        fn flash_capture(&mut self) {
            self.calls.push(Call::Flash);
        }
    }

    fn session() -> CaptureSession<FakeHost> {
        CaptureSession::new(FakeHost::new(), StreamConfig::default(), SessionOptions::default())
    }

    fn live_session() -> CaptureSession<FakeHost> {
        let mut session = session();
        let req = session.request_stream().unwrap();
        let stream = session.host_mut().grant(1);
        assert!(session.complete_acquire(req.generation, Ok(stream)));
        session.host_mut().calls.clear();
        session
    }

    #[test]
    fn test_successful_acquire_binds_and_reports() {
        let mut session = session();
        let req = session.request_stream().unwrap();
        assert_eq!(req.source, StreamSource::Camera);
        assert_eq!(req.constraints, MediaConstraints { video: true, audio: true });

        let stream = session.host_mut().grant(7);
        assert!(session.complete_acquire(req.generation, Ok(stream)));
        assert!(session.has_stream());
        assert_eq!(session.host().bound, Some(7));
        assert!(session
            .host()
            .calls
            .contains(&Call::Status("Camera preview ready".to_string(), false)));
        assert!(session.host().calls.contains(&Call::CreateEncoder(7, req.generation)));
    }

    #[test]
    fn test_toggle_releases_old_stream_before_request() {
        let mut session = live_session();
        let req = session.set_screen_mode(true).unwrap();
        assert_eq!(req.source, StreamSource::Screen);
        assert_eq!(session.host().calls[0], Call::Release(1));
        assert!(session.host().live.is_empty());
        assert!(!session.has_stream());

        let stream = session.host_mut().grant(2);
        assert!(session.complete_acquire(req.generation, Ok(stream)));
        assert!(session
            .host()
            .calls
            .contains(&Call::Status("Screen sharing active".to_string(), false)));
    }

    #[test]
    fn test_racing_acquisitions_keep_one_live_stream() {
        let mut session = live_session();
        let first = session.set_audio(false).unwrap();
        let second = session.set_screen_mode(true).unwrap();
        assert!(second.generation > first.generation);

        // The newer request resolves first, then the stale one.
        let newer = session.host_mut().grant(3);
        assert!(session.complete_acquire(second.generation, Ok(newer)));
        let stale = session.host_mut().grant(2);
        assert!(!session.complete_acquire(first.generation, Ok(stale)));

        assert_eq!(session.host().live, BTreeSet::from([3]));
        assert_eq!(session.host().bound, Some(3));
        assert_eq!(session.stream(), Some(&3));
    }

    #[test]
    fn test_many_toggle_flips_never_hold_two_streams() {
        let mut session = live_session();
        let mut next_id = 10;
        let mut outstanding = Vec::new();
        for flip in 0..12 {
            let req = if flip % 2 == 0 {
                session.set_audio(flip % 4 == 0)
            } else {
                session.set_screen_mode(flip % 3 == 0)
            }
            .unwrap();
            outstanding.push(req.generation);
            // Resolve every third request immediately, the rest later.
            if flip % 3 == 0 {
                let id = session.host_mut().grant(next_id);
                next_id += 1;
                session.complete_acquire(req.generation, Ok(id));
                assert!(session.host().live.len() <= 1);
            }
        }
        for generation in outstanding {
            let id = session.host_mut().grant(next_id);
            next_id += 1;
            session.complete_acquire(generation, Ok(id));
            assert!(session.host().live.len() <= 1);
        }
        assert_eq!(session.host().live.len(), 1);
    }

    #[test]
    fn test_acquire_failure_reports_error() {
        let mut session = session();
        let req = session.request_stream().unwrap();
        let err = CaptureError::MediaAccess("NotAllowedError".to_string());
        assert!(!session.complete_acquire(req.generation, Err(err)));
        assert!(!session.has_stream());
        assert!(session.host().calls.contains(&Call::Status(
            "Permission denied or no media devices found".to_string(),
            true
        )));

        session.toggle_record();
        session.take_snapshot();
        assert!(!session.host().calls.contains(&Call::StartEncoder));
        assert_eq!(session.host().snapshots, 0);
    }

    #[test]
    fn test_screen_falls_back_when_unsupported() {
        let mut host = FakeHost::new();
        host.screen_supported = false;
        let mut session =
            CaptureSession::new(host, StreamConfig::from_toggles(true, false), SessionOptions::default());
        let req = session.request_stream().unwrap();
        assert_eq!(req.source, StreamSource::Camera);
        let stream = session.host_mut().grant(1);
        session.complete_acquire(req.generation, Ok(stream));
        assert!(session
            .host()
            .calls
            .contains(&Call::Status("Camera preview ready".to_string(), false)));
    }

    #[test]
    fn test_record_without_stream_is_noop() {
        let mut session = session();
        session.toggle_record();
        assert!(!session.is_recording());
        assert!(session.host().calls.is_empty());
    }

    #[test]
    fn test_start_resets_timer_and_buffer() {
        let mut session = live_session();
        session.toggle_record();
        session.push_chunk(1, "a".to_string());
        session.tick();
        session.tick();
        session.toggle_record();
        session.encoder_stopped(1);

        session.toggle_record();
        assert_eq!(session.timer().elapsed_seconds(), 0);
        assert_eq!(session.buffered_chunks(), 0);
        assert!(session.host().calls.contains(&Call::Timer("00:00:00".to_string(), true)));
    }

    #[test]
    fn test_stop_drains_into_one_artifact_in_order() {
        let mut session = live_session();
        session.toggle_record();
        assert!(session.is_recording());
        assert!(session.host().calls.contains(&Call::Indicator(true)));
        assert!(session.host().calls.contains(&Call::StartTicker));

        for chunk in ["c1", "c2", "c3"] {
            session.push_chunk(1, chunk.to_string());
        }
        session.toggle_record();
        assert!(session.host().calls.contains(&Call::StopEncoder));
        assert!(session.host().calls.contains(&Call::Timer("00:00:00".to_string(), false)));

        // Final chunk arrives after the stop request, before the stop event.
        session.push_chunk(1, "c4".to_string());
        session.encoder_stopped(1);

        let assembled: Vec<_> = session
            .host()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Assemble(chunks) => Some(chunks.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(assembled, vec![vec!["c1", "c2", "c3", "c4"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()]);
        assert_eq!(session.buffered_chunks(), 0);
        assert!(!session.is_recording());
        assert_eq!(session.gallery().len(), 1);
        assert!(session.host().calls.contains(&Call::Save(
            "blob:recording-1".to_string(),
            "video.mp4".to_string()
        )));
        assert_eq!(session.host().calls.last(), Some(&Call::Indicator(false)));

        // A duplicate stop event produces nothing.
        session.encoder_stopped(1);
        assert_eq!(session.host().recordings, 1);
    }

    #[test]
    fn test_toggle_on_while_draining_is_ignored() {
        let mut session = live_session();
        session.toggle_record();
        session.toggle_record();
        session.toggle_record();
        assert_eq!(session.host().count(|c| *c == Call::StartEncoder), 1);
    }

    #[test]
    fn test_toggles_ignored_while_recording() {
        let mut session = live_session();
        session.toggle_record();
        assert!(session.set_screen_mode(true).is_none());
        assert!(session.set_audio(false).is_none());
        assert_eq!(session.config(), StreamConfig::default());
        assert!(session.has_stream());
    }

    #[test]
    fn test_stale_generation_chunks_dropped() {
        let mut session = live_session();
        session.toggle_record();
        session.push_chunk(99, "stale".to_string());
        assert_eq!(session.buffered_chunks(), 0);
    }

    #[test]
    fn test_tick_renders_elapsed() {
        let mut session = live_session();
        session.tick();
        assert!(session.host().calls.is_empty());

        session.toggle_record();
        for _ in 0..45 {
            session.tick();
        }
        assert_eq!(session.host().calls.last(), Some(&Call::Timer("00:00:45".to_string(), true)));
    }

    #[test]
    fn test_stream_end_while_recording_finalizes() {
        let mut session = live_session();
        session.toggle_record();
        session.push_chunk(1, "x".to_string());
        session.stream_ended(1);
        assert!(!session.has_stream());
        assert!(session.host().calls.contains(&Call::StopEncoder));
        assert!(session.host().calls.contains(&Call::Status("Stream ended".to_string(), true)));

        session.encoder_stopped(1);
        assert_eq!(session.gallery().len(), 1);
        assert!(!session.is_recording());
        assert!(session.host().live.is_empty());

        // Recording is unavailable until a new stream arrives.
        session.toggle_record();
        assert_eq!(session.host().count(|c| *c == Call::StartEncoder), 1);
        assert!(session.request_stream().is_some());
    }

    #[test]
    fn test_encoder_creation_failure_keeps_preview() {
        let mut host = FakeHost::new();
        host.fail_encoder = true;
        let mut session = CaptureSession::new(host, StreamConfig::default(), SessionOptions::default());
        let req = session.request_stream().unwrap();
        let stream = session.host_mut().grant(4);
        assert!(session.complete_acquire(req.generation, Ok(stream)));

        session.toggle_record();
        assert!(!session.is_recording());
        session.take_snapshot();
        assert_eq!(session.gallery().len(), 1);
    }

    #[test]
    fn test_snapshot_uses_current_filter() {
        let mut session = live_session();
        session.take_snapshot();
        session.select_filter("rgba(255, 0, 0, 1)").unwrap();
        session.take_snapshot();

        let overlays: Vec<_> = session
            .host()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Capture(rgba) => Some(*rgba),
                _ => None,
            })
            .collect();
        assert_eq!(overlays, vec![Rgba::TRANSPARENT, Rgba { r: 255, g: 0, b: 0, a: 255 }]);
        assert_eq!(session.host().count(|c| *c == Call::Flash), 2);
        assert!(session
            .host()
            .calls
            .contains(&Call::Save("data:snapshot-2".to_string(), "image.jpg".to_string())));

        let newest = session.gallery().items().next().unwrap();
        assert_eq!(newest.url, "data:snapshot-2");
        assert_eq!(newest.kind, ArtifactKind::Snapshot);
    }

    #[test]
    fn test_filter_selection_updates_preview_in_any_state() {
        let mut session = session();
        session.select_filter("rgba(0, 0, 255, 0.3)").unwrap();
        assert_eq!(session.host().calls, vec![Call::Overlay("rgba(0, 0, 255, 0.3)".to_string())]);

        let mut recording = live_session();
        recording.toggle_record();
        recording.select_filter("transparent").unwrap();
        assert_eq!(recording.host().calls.last(), Some(&Call::Overlay("transparent".to_string())));
    }

    #[test]
    fn test_invalid_filter_keeps_previous() {
        let mut session = session();
        session.select_filter("#ff0000").unwrap();
        assert!(session.select_filter("blur(4px)").is_err());
        assert_eq!(session.filter().css(), "#ff0000");
        assert_eq!(session.host().count(|c| matches!(c, Call::Overlay(_))), 1);
    }

    #[test]
    fn test_artifact_effects_toggle_independently() {
        let options = SessionOptions {
            auto_download: false,
            ..SessionOptions::default()
        };
        let mut session = CaptureSession::new(FakeHost::new(), StreamConfig::default(), options);
        let req = session.request_stream().unwrap();
        let stream = session.host_mut().grant(1);
        session.complete_acquire(req.generation, Ok(stream));
        session.take_snapshot();
        assert_eq!(session.gallery().len(), 1);
        assert_eq!(session.host().count(|c| matches!(c, Call::Save(..))), 0);

        let options = SessionOptions {
            keep_in_gallery: false,
            ..SessionOptions::default()
        };
        let mut session = CaptureSession::new(FakeHost::new(), StreamConfig::default(), options);
        let req = session.request_stream().unwrap();
        let stream = session.host_mut().grant(1);
        session.complete_acquire(req.generation, Ok(stream));
        session.take_snapshot();
        assert!(session.gallery().is_empty());
        assert_eq!(session.host().count(|c| matches!(c, Call::Save(..))), 1);
        assert_eq!(session.host().count(|c| matches!(c, Call::Gallery(_))), 0);
    }

    #[test]
    fn test_gallery_actions() {
        let mut session = live_session();
        session.take_snapshot();
        session.toggle_record();
        session.toggle_record();
        session.encoder_stopped(1);

        let ids: Vec<u64> = session.gallery().items().map(|i| i.id).collect();
        assert_eq!(session.host().calls.iter().rev().find_map(|c| match c {
            Call::Gallery(g) => Some(g.clone()),
            _ => None,
        }), Some(ids.clone()));

        session.host_mut().calls.clear();
        session.preview_item(ids[0]);
        session.download_item(ids[1]);
        session.download_item(12345);
        assert_eq!(
            session.host().calls,
            vec![
                Call::Open("blob:recording-1".to_string()),
                Call::Save("data:snapshot-1".to_string(), "image.jpg".to_string()),
            ]
        );
    }
}
