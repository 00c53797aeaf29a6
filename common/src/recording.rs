use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    Idle,
    Recording,
}

impl Default for RecordingState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Chunk buffer for one stream's encoder. `C` is the platform chunk type
/// (a `Blob` in the browser).
#[derive(Debug)]
pub struct RecordingSession<C> {
    state: RecordingState,
    buffer: Vec<C>,
    stream_generation: u64,
}

impl<C> RecordingSession<C> {
    pub fn new(stream_generation: u64) -> Self {
        Self {
            state: RecordingState::Idle,
            buffer: Vec::new(),
            stream_generation,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    /// Generation of the stream this session records.
    pub fn stream_generation(&self) -> u64 {
        self.stream_generation
    }

    pub fn buffered_chunks(&self) -> usize {
        self.buffer.len()
    }

    /// Enter `Recording` with an empty buffer. Returns false if already recording.
    pub fn begin(&mut self) -> bool {
        if self.is_recording() {
            return false;
        }
        self.buffer.clear();
        self.state = RecordingState::Recording;
        true
    }

    /// Append one encoded chunk. Chunks delivered while idle are dropped.
    pub fn push(&mut self, chunk: C) -> bool {
        if !self.is_recording() {
            return false;
        }
        self.buffer.push(chunk);
        true
    }

    /// Take every buffered chunk in arrival order and return to `Idle`.
    /// Returns `None` when no recording was in progress.
    pub fn drain(&mut self) -> Option<Vec<C>> {
        if !self.is_recording() {
            return None;
        }
        self.state = RecordingState::Idle;
        Some(std::mem::take(&mut self.buffer))
    }
}
