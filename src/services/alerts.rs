//! Device alerts: vibration pulses, notification sound and volume

use std::{future::Future, path::PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::AlertError;

/// Default freedesktop sound used as the notification sound
pub const DEFAULT_SOUND_FILE: &str = "/usr/share/sounds/freedesktop/stereo/complete.oga";

/// On/off vibration timings in milliseconds, starting with a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VibrationPattern {
    pub timings_ms: &'static [u64],
    pub repeat: bool,
}

impl VibrationPattern {
    /// Short confirmation when a rest starts
    pub const START: VibrationPattern = VibrationPattern {
        timings_ms: &[0, 200],
        repeat: false,
    };

    /// Two long pulses when a rest is over
    pub const COMPLETION: VibrationPattern = VibrationPattern {
        timings_ms: &[0, 800, 400, 800],
        repeat: false,
    };

    /// Total time the motor is on
    pub fn on_time_ms(&self) -> u64 {
        self.timings_ms.iter().skip(1).step_by(2).sum()
    }
}

/// Alert hardware the countdown controller drives
pub trait AlertDevice: Send + Sync + 'static {
    /// Start a vibration pulse; returns immediately
    fn vibrate(&self, pattern: &VibrationPattern);

    /// Current volume of the notification stream, 0 when muted
    fn notification_volume(&self) -> impl Future<Output = Result<u32, AlertError>> + Send;

    /// Play the default notification sound once
    fn play_notification(&self) -> impl Future<Output = Result<(), AlertError>> + Send;
}

/// Host alerts: PulseAudio volume and a command-line player.
/// Hosts have no vibration motor, so pulses are only logged.
#[derive(Debug, Clone)]
pub struct SystemAlerts {
    player: String,
    sound_file: PathBuf,
}

impl SystemAlerts {
    pub fn new(player: impl Into<String>, sound_file: impl Into<PathBuf>) -> Self {
        Self {
            player: player.into(),
            sound_file: sound_file.into(),
        }
    }
}

impl Default for SystemAlerts {
    fn default() -> Self {
        Self::new("paplay", DEFAULT_SOUND_FILE)
    }
}

impl AlertDevice for SystemAlerts {
    fn vibrate(&self, pattern: &VibrationPattern) {
        info!(
            "Vibrating: pattern={:?}ms repeat={} on_time={}ms",
            pattern.timings_ms,
            pattern.repeat,
            pattern.on_time_ms()
        );
    }

    async fn notification_volume(&self) -> Result<u32, AlertError> {
        let mute = run_pactl(&["get-sink-mute", "@DEFAULT_SINK@"]).await?;
        if parse_mute(&mute) {
            debug!("Default sink is muted");
            return Ok(0);
        }
        let volume = run_pactl(&["get-sink-volume", "@DEFAULT_SINK@"]).await?;
        parse_volume_percent(&volume).ok_or(AlertError::VolumeParse(volume))
    }

    async fn play_notification(&self) -> Result<(), AlertError> {
        debug!("Playing {} with {}", self.sound_file.display(), self.player);

        let output = Command::new(&self.player)
            .arg(&self.sound_file)
            .output()
            .await
            .map_err(|e| AlertError::Spawn {
                command: self.player.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(AlertError::Exit {
                command: self.player.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("Notification sound played");
        Ok(())
    }
}

async fn run_pactl(args: &[&str]) -> Result<String, AlertError> {
    let output = Command::new("pactl")
        .args(args)
        .output()
        .await
        .map_err(|e| AlertError::Spawn {
            command: "pactl".to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(AlertError::Exit {
            command: format!("pactl {}", args.join(" ")),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// First `NN%` figure of `pactl get-sink-volume` output
pub fn parse_volume_percent(output: &str) -> Option<u32> {
    output
        .split_whitespace()
        .find_map(|word| word.trim_end_matches(',').strip_suffix('%'))
        .and_then(|digits| digits.parse().ok())
}

/// `Mute: yes` from `pactl get-sink-mute`
pub fn parse_mute(output: &str) -> bool {
    output
        .trim()
        .strip_prefix("Mute:")
        .map(|value| value.trim().eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_volume_percent() {
        let output = "Volume: front-left: 42598 /  65% / -11.23 dB,   front-right: 42598 /  65% / -11.23 dB\n        balance 0.00\n";
        assert_eq!(parse_volume_percent(output), Some(65));
        assert_eq!(parse_volume_percent("Volume: front-left: 0 /   0% / -inf dB"), Some(0));
        assert_eq!(parse_volume_percent("no sink"), None);
    }

    #[test]
    fn test_parse_mute() {
        assert!(parse_mute("Mute: yes\n"));
        assert!(!parse_mute("Mute: no\n"));
        assert!(!parse_mute(""));
    }

    #[test]
    fn test_completion_pattern() {
        assert_eq!(VibrationPattern::COMPLETION.timings_ms, &[0, 800, 400, 800]);
        assert!(!VibrationPattern::COMPLETION.repeat);
        assert_eq!(VibrationPattern::COMPLETION.on_time_ms(), 1600);
        assert_eq!(VibrationPattern::START.on_time_ms(), 200);
    }
}
