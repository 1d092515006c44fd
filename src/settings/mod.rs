//! Settings module
//!
//! The configuration snapshot and the store it is read from.

pub mod model;
pub mod store;

// Re-export main types
pub use model::{Settings, SettingsPatch, TriggerMode, DEFAULT_REST_SECONDS};
pub use store::{default_settings_path, JsonFileStore, MemoryStore, SettingsStore};
