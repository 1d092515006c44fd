//! Rest Timer - A countdown between exercise sets
//!
//! This library provides the rest countdown state machine, the controller
//! that drives it from taps and camera-button presses, device alerts,
//! the prevent-sleep lock and a local HTTP control API.

pub mod config;
pub mod error;
pub mod settings;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, RestCountdown};
pub use api::create_router;
pub use tasks::{ControllerHandle, Input, ScreenController};
pub use utils::signals::shutdown_signal;
