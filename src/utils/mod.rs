//! Utility functions module
//!
//! Process-level helpers for the service binary.

pub mod signals;

pub use signals::shutdown_signal;
