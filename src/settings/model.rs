//! Settings snapshot and trigger mode

use serde::{Deserialize, Serialize};

/// Rest length used when the store has no value yet
pub const DEFAULT_REST_SECONDS: u32 = 30;

/// Which inputs are allowed to start a rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    #[default]
    Both,
    Tap,
    Camera,
}

impl TriggerMode {
    /// Tapping the countdown area starts and stops a rest
    pub fn allows_tap(self) -> bool {
        matches!(self, TriggerMode::Both | TriggerMode::Tap)
    }

    /// Pressing the camera button starts a rest
    pub fn allows_camera(self) -> bool {
        matches!(self, TriggerMode::Both | TriggerMode::Camera)
    }

    /// Instruction shown on the countdown area while idle
    pub fn idle_instruction(self) -> &'static str {
        match self {
            TriggerMode::Both => "Tap here or press the camera button to rest",
            TriggerMode::Tap => "Tap here to rest",
            TriggerMode::Camera => "Press the camera button to rest",
        }
    }
}

/// Configuration snapshot, read from the store before every action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Rest length in seconds
    pub rest_seconds: u32,
    /// Which inputs start a rest
    pub start_timer_control: TriggerMode,
    /// Pulse on start and vibrate at the end of a rest
    pub vibrate: bool,
    /// Play the notification sound at the end of a rest
    pub play_sound: bool,
    /// Hold the sleep lock while resumed
    pub prevent_sleep: bool,
}

impl Settings {
    /// Reject values the countdown cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if self.rest_seconds == 0 {
            return Err("restSeconds must be a positive number of seconds".to_string());
        }
        Ok(())
    }
}

/// Partial update from the settings screen. Omitted keys keep their
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub rest_seconds: Option<u32>,
    pub start_timer_control: Option<TriggerMode>,
    pub vibrate: Option<bool>,
    pub play_sound: Option<bool>,
    pub prevent_sleep: Option<bool>,
}

impl SettingsPatch {
    /// Settings with the given keys replaced
    pub fn merged_into(&self, mut settings: Settings) -> Settings {
        if let Some(rest_seconds) = self.rest_seconds {
            settings.rest_seconds = rest_seconds;
        }
        if let Some(mode) = self.start_timer_control {
            settings.start_timer_control = mode;
        }
        if let Some(vibrate) = self.vibrate {
            settings.vibrate = vibrate;
        }
        if let Some(play_sound) = self.play_sound {
            settings.play_sound = play_sound;
        }
        if let Some(prevent_sleep) = self.prevent_sleep {
            settings.prevent_sleep = prevent_sleep;
        }
        settings
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rest_seconds: DEFAULT_REST_SECONDS,
            start_timer_control: TriggerMode::Both,
            vibrate: true,
            play_sound: true,
            prevent_sleep: true,
        }
    }
}
