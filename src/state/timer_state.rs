//! Published countdown status

use serde::{Deserialize, Serialize};

use crate::settings::TriggerMode;
use super::Frame;

/// Snapshot of the countdown area and session, published after every event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownStatus {
    pub frame: Frame,
    pub counting: bool,
    pub seconds_remaining: u32,
    pub generation: u64,
    /// Current text of the rest length field
    pub duration_text: String,
    pub wake_lock_held: bool,
}

impl CountdownStatus {
    /// Status before any session has started
    pub fn idle(mode: TriggerMode, duration_text: String) -> Self {
        Self {
            frame: Frame::idle(mode),
            counting: false,
            seconds_remaining: 0,
            generation: 0,
            duration_text,
            wake_lock_held: false,
        }
    }

    /// Label used in API responses
    pub fn label(&self) -> &'static str {
        if self.frame.is_resting() { "resting" } else { "idle" }
    }
}
