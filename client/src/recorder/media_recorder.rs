use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobEvent, Event, MediaRecorder, MediaRecorderOptions, MediaStream};

use crate::recorder::state;

/// `MediaRecorder` bound to one stream generation. Data and stop events are
/// forwarded to the session tagged with that generation.
pub struct Recorder {
    inner: MediaRecorder,
    chunk_interval_ms: Option<i32>,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
    _on_stop: Closure<dyn FnMut(Event)>,
}

impl Recorder {
    pub fn new(
        stream: &MediaStream,
        generation: u64,
        preferred_mime_type: &str,
        chunk_interval_ms: Option<i32>,
    ) -> Result<Self, JsValue> {
        let inner = if MediaRecorder::is_type_supported(preferred_mime_type) {
            let options = MediaRecorderOptions::new();
            options.set_mime_type(preferred_mime_type);
            MediaRecorder::new_with_media_stream_and_media_recorder_options(stream, &options)?
        } else {
            log::info!(
                "[Recorder] {} not supported by this browser, using default encoder",
                preferred_mime_type
            );
            MediaRecorder::new_with_media_stream(stream)?
        };

        let on_data = Closure::wrap(Box::new(move |event: BlobEvent| {
            if let Some(blob) = event.data() {
                state::with_session(|session| session.push_chunk(generation, blob));
            }
        }) as Box<dyn FnMut(BlobEvent)>);
        inner.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));

        let on_stop = Closure::wrap(Box::new(move |_event: Event| {
            state::with_session(|session| session.encoder_stopped(generation));
        }) as Box<dyn FnMut(Event)>);
        inner.set_onstop(Some(on_stop.as_ref().unchecked_ref()));

        log::debug!("[Recorder] Encoder ready ({}) for generation {}", inner.mime_type(), generation);

        Ok(Self {
            inner,
            chunk_interval_ms,
            _on_data: on_data,
            _on_stop: on_stop,
        })
    }

    pub fn start(&self) -> Result<(), JsValue> {
        match self.chunk_interval_ms {
            Some(ms) if ms > 0 => self.inner.start_with_time_slice(ms),
            _ => self.inner.start(),
        }
    }

    pub fn stop(&self) -> Result<(), JsValue> {
        self.inner.stop()
    }

}

impl Drop for Recorder {
    fn drop(&mut self) {
        // The closures die with us; detach them so late events find nothing.
        self.inner.set_ondataavailable(None);
        self.inner.set_onstop(None);
        if self.inner.state() != web_sys::RecordingState::Inactive {
            let _ = self.inner.stop();
        }
    }
}

/// Join recorded chunks, in order, into one blob of `mime_type`.
pub fn assemble(chunks: &[Blob], mime_type: &str) -> Result<Blob, JsValue> {
    let parts = js_sys::Array::new();
    for chunk in chunks {
        parts.push(chunk);
    }
    let bag = web_sys::BlobPropertyBag::new();
    bag.set_type(mime_type);
    Blob::new_with_blob_sequence_and_options(&parts, &bag)
}
