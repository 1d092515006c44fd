//! Error types shared across the crate

use std::process::ExitStatus;

use thiserror::Error;

/// Failures reading or writing the settings store
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Settings lock poisoned")]
    Poisoned,

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Failures of the alert sound path. Never fatal to a countdown.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    Exit {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Could not read notification volume from: {0:?}")]
    VolumeParse(String),
}

/// Failures acquiring or releasing the sleep lock
#[derive(Debug, Error)]
pub enum WakeLockError {
    #[error("Failed to spawn sleep inhibitor: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to stop sleep inhibitor: {0}")]
    Kill(#[source] std::io::Error),
}

/// The controller task is no longer receiving inputs
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Countdown controller has stopped")]
    Stopped,
}
