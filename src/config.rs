//! Configuration and CLI argument handling

use std::{path::PathBuf, sync::Arc};
use clap::Parser;

use crate::{
    error::SettingsError,
    services::{SystemAlerts, DEFAULT_SOUND_FILE},
    settings::{JsonFileStore, MemoryStore, SettingsStore},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "rest-timer")]
#[command(about = "A rest timer service for counting down between exercise sets")]
#[command(version)]
pub struct Config {
    /// Port to bind the control API to
    #[arg(short, long, default_value = "20555")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Settings file (defaults to <config dir>/rest-timer/settings.json)
    #[arg(short, long)]
    pub settings_file: Option<PathBuf>,

    /// Keep settings in memory only
    #[arg(long, conflicts_with = "settings_file")]
    pub ephemeral: bool,

    /// Command used to play the notification sound
    #[arg(long, default_value = "paplay")]
    pub player: String,

    /// Notification sound file
    #[arg(long, default_value = DEFAULT_SOUND_FILE)]
    pub sound_file: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Settings store selected by the flags
    pub fn settings_store(&self) -> Result<Arc<dyn SettingsStore>, SettingsError> {
        if self.ephemeral {
            return Ok(Arc::new(MemoryStore::default()));
        }
        let store = match &self.settings_file {
            Some(path) => JsonFileStore::new(path),
            None => JsonFileStore::in_config_dir()?,
        };
        Ok(Arc::new(store))
    }

    /// Alert device using the configured player and sound
    pub fn alerts(&self) -> SystemAlerts {
        SystemAlerts::new(self.player.clone(), self.sound_file.clone())
    }
}
