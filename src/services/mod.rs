//! Device service module
//!
//! Alert hardware and the prevent-sleep lock, each behind a trait with a
//! host backend.

pub mod alerts;
pub mod system;
pub mod wake_lock;

// Re-export main types
pub use alerts::{AlertDevice, SystemAlerts, VibrationPattern, DEFAULT_SOUND_FILE};
pub use system::check_command_available;
pub use wake_lock::{SystemdInhibitor, WakeLock};
