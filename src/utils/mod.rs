//! Utility functions module
//!
//! Display formatting helpers and process signal handling.

pub mod format;
pub mod signals;

pub use format::{format_clock, format_clock_seconds, format_hms, Severity};
pub use signals::shutdown_signal;
