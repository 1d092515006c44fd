//! Render model of the countdown surface

use serde::{Deserialize, Serialize};

use crate::settings::TriggerMode;

/// Instruction shown while a rest is counting down
pub const RESTING_INSTRUCTION: &str = "Rest left";

/// Background of the countdown area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    Idle,
    Resting,
}

impl Background {
    /// RGB hex color
    pub fn color(self) -> &'static str {
        match self {
            Background::Idle => "#00FF00",
            Background::Resting => "#FF0000",
        }
    }
}

/// Everything the countdown area shows at one moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub background: Background,
    pub instruction: String,
    pub countdown: String,
}

impl Frame {
    pub fn idle(mode: TriggerMode) -> Self {
        Self {
            background: Background::Idle,
            instruction: mode.idle_instruction().to_string(),
            countdown: String::new(),
        }
    }

    pub fn resting(seconds_remaining: u32) -> Self {
        Self {
            background: Background::Resting,
            instruction: RESTING_INSTRUCTION.to_string(),
            countdown: seconds_remaining.to_string(),
        }
    }

    /// RGB hex color of the background
    pub fn color(&self) -> &'static str {
        self.background.color()
    }

    pub fn is_resting(&self) -> bool {
        self.background == Background::Resting
    }
}
