//! Shared state behind the control API

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    error::{ControllerError, SettingsError},
    settings::{Settings, SettingsPatch, SettingsStore},
    tasks::{ControllerHandle, Input},
};
use super::CountdownStatus;

/// State handed to every HTTP handler
pub struct AppState {
    /// Input queue and status feed of the countdown controller
    pub controller: ControllerHandle,
    /// Settings store shared with the controller
    pub settings: Arc<dyn SettingsStore>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(
        controller: ControllerHandle,
        settings: Arc<dyn SettingsStore>,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            controller,
            settings,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Forward an input to the controller and record it as the last action
    pub async fn dispatch(&self, action: &str, input: Input) -> Result<CountdownStatus, ControllerError> {
        let status = self.controller.dispatch(input).await?;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
        debug!("Action {} processed, now {}", action, status.label());

        Ok(status)
    }

    /// Latest published countdown status
    pub fn countdown_status(&self) -> CountdownStatus {
        self.controller.status()
    }

    pub fn get_settings(&self) -> Result<Settings, SettingsError> {
        self.settings.load()
    }

    /// Merge, validate and persist settings from the settings screen
    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<Settings, SettingsError> {
        let settings = self.settings.update(&patch)?;

        if let Err(e) = self.dispatch("settings", Input::SettingsChanged).await {
            tracing::warn!("Settings saved but controller not notified: {}", e);
        }
        Ok(settings)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
