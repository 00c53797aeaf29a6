//! Elapsed-time counter for an active recording.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingTimer {
    elapsed_seconds: u64,
    running: bool,
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.elapsed_seconds = 0;
        self.running = true;
    }

    /// Advance by one second. Ticks arriving while stopped are ignored.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_seconds += 1;
        true
    }

    pub fn stop(&mut self) {
        self.elapsed_seconds = 0;
        self.running = false;
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn display(&self) -> String {
        format_hms(self.elapsed_seconds)
    }
}

/// Zero-padded `HH:MM:SS`. Hours grow past two digits instead of wrapping.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
