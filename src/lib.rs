//! Exam Timer - A state-managed HTTP server driving an exam countdown
//!
//! The timer waits for a configured wall-clock start time, counts down the
//! exam duration, moves into extra time and then stops. The HTTP API arms,
//! pauses and resets it, and streams display snapshots.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, ExamTimer, Phase, TimerSnapshot};
pub use utils::signals::shutdown_signal;
