//! Persistent key/value settings store

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::debug;

use crate::error::SettingsError;
use super::{Settings, SettingsPatch};

const APP_NAME: &str = "rest-timer";
const SETTINGS_FILE: &str = "settings.json";

/// Storage behind the settings snapshot. Values survive process restarts
/// for the file store.
pub trait SettingsStore: Send + Sync {
    /// Read the current settings
    fn load(&self) -> Result<Settings, SettingsError>;

    /// Replace all settings
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;

    /// Persist a new rest length, leaving the other keys untouched
    fn set_rest_seconds(&self, seconds: u32) -> Result<(), SettingsError> {
        let mut settings = self.load()?;
        settings.rest_seconds = seconds;
        self.save(&settings)
    }

    /// Merge a partial update into the stored settings and persist it
    fn update(&self, patch: &SettingsPatch) -> Result<Settings, SettingsError> {
        let settings = patch.merged_into(self.load()?);
        settings.validate().map_err(SettingsError::Invalid)?;
        self.save(&settings)?;
        Ok(settings)
    }
}

/// Settings kept in a JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles from the controller and the API
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store under the user's config directory
    pub fn in_config_dir() -> Result<Self, SettingsError> {
        Ok(Self::new(default_settings_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Settings, SettingsError> {
        if !self.path.exists() {
            debug!("No settings file at {}, using defaults", self.path.display());
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content)?;
        debug!("Settings written to {}", self.path.display());
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        let _guard = self.lock.lock().map_err(|_| SettingsError::Poisoned)?;
        self.read()
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let _guard = self.lock.lock().map_err(|_| SettingsError::Poisoned)?;
        self.write(settings)
    }

    fn set_rest_seconds(&self, seconds: u32) -> Result<(), SettingsError> {
        let _guard = self.lock.lock().map_err(|_| SettingsError::Poisoned)?;
        let mut settings = self.read()?;
        settings.rest_seconds = seconds;
        self.write(&settings)
    }

    fn update(&self, patch: &SettingsPatch) -> Result<Settings, SettingsError> {
        let _guard = self.lock.lock().map_err(|_| SettingsError::Poisoned)?;
        let settings = patch.merged_into(self.read()?);
        settings.validate().map_err(SettingsError::Invalid)?;
        self.write(&settings)?;
        Ok(settings)
    }
}

/// Settings held in memory only, for ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    settings: Mutex<Settings>,
}

impl MemoryStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        self.settings
            .lock()
            .map(|settings| settings.clone())
            .map_err(|_| SettingsError::Poisoned)
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let mut current = self.settings.lock().map_err(|_| SettingsError::Poisoned)?;
        *current = settings.clone();
        Ok(())
    }
}

/// `<config dir>/rest-timer/settings.json`
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    let mut path = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
    path.push(APP_NAME);
    path.push(SETTINGS_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TriggerMode;

    #[test]
    fn test_missing_file_reads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("settings.json"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_rest_seconds_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = JsonFileStore::new(&path);
        store
            .save(&Settings {
                start_timer_control: TriggerMode::Tap,
                ..Settings::default()
            })
            .unwrap();
        store.set_rest_seconds(90).unwrap();

        let reopened = JsonFileStore::new(&path);
        let settings = reopened.load().unwrap();
        assert_eq!(settings.rest_seconds, 90);
        assert_eq!(settings.start_timer_control, TriggerMode::Tap);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_update_merges_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("settings.json"));
        store
            .save(&Settings {
                vibrate: false,
                ..Settings::default()
            })
            .unwrap();

        let patch = SettingsPatch {
            start_timer_control: Some(TriggerMode::Camera),
            ..SettingsPatch::default()
        };
        let saved = store.update(&patch).unwrap();
        assert_eq!(saved.start_timer_control, TriggerMode::Camera);
        assert!(!saved.vibrate);
        assert_eq!(store.load().unwrap(), saved);

        let invalid = SettingsPatch {
            rest_seconds: Some(0),
            ..SettingsPatch::default()
        };
        assert!(matches!(store.update(&invalid), Err(SettingsError::Invalid(_))));
        assert_eq!(store.load().unwrap(), saved);
    }

    #[test]
    fn test_memory_store_set_rest_seconds() {
        let store = MemoryStore::default();
        store.set_rest_seconds(45).unwrap();
        assert_eq!(store.load().unwrap().rest_seconds, 45);
    }
}
