//! Background tasks module
//!
//! The screen controller that runs alongside the HTTP server.

pub mod controller;

// Re-export main types
pub use controller::{ControllerHandle, Input, ScreenController};
