//! Hooks fired when the exam changes phase

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A phase transition worth telling the room about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseAlert {
    ExamStarted,
    MainTimeComplete,
    ExtraTimeComplete,
    /// The countdown stopped because its state was inconsistent
    ForcedStop,
}

impl PhaseAlert {
    pub fn message(self) -> &'static str {
        match self {
            PhaseAlert::ExamStarted => "Exam started",
            PhaseAlert::MainTimeComplete => "Main exam time is over, extra time has started",
            PhaseAlert::ExtraTimeComplete => "Extra time is over",
            PhaseAlert::ForcedStop => "Timer stopped unexpectedly",
        }
    }
}

/// Receiver for phase alerts (sound, flashing screen, notification).
///
/// Called after the timer's lock is released, so implementations may read
/// timer state but should return quickly.
pub trait AlertSink: Debug + Send + Sync {
    fn alert(&self, alert: PhaseAlert);
}

/// Writes alerts to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn alert(&self, alert: PhaseAlert) {
        match alert {
            PhaseAlert::ForcedStop => warn!("{}", alert.message()),
            _ => info!("{}", alert.message()),
        }
    }
}
