//! Error types surfaced by the timer engine

use thiserror::Error;

/// Errors returned by timer commands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The exam configuration was rejected; nothing was changed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl TimerError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}
