//! State management module
//!
//! The countdown state machine, its render model and the state shared with
//! the HTTP handlers.

pub mod app_state;
pub mod countdown;
pub mod frame;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use countdown::{parse_rest_seconds, CompletionAlert, Effect, RestCountdown, TICK_INTERVAL};
pub use frame::{Background, Frame, RESTING_INSTRUCTION};
pub use timer_state::CountdownStatus;
