//! Display-ready view of the timer, published after every change

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{
    exam_config::Schedule,
    timer_state::{Phase, TimerState},
};
use crate::utils::{format_clock_seconds, format_hms, Severity};

/// Everything a display needs to render the timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub paused: bool,
    pub main_remaining_seconds: u64,
    pub extra_remaining_seconds: u64,
    /// `HH:MM:SS`
    pub main_remaining: String,
    /// `HH:MM:SS`
    pub extra_remaining: String,
    pub severity: Severity,
    pub main_complete: bool,
    pub extra_complete: bool,
    pub schedule: Option<Schedule>,
    /// Wall-clock time at the last check or tick, `HH:MM:SS`
    pub current_time: Option<String>,
    pub status_text: String,
    pub main_label: String,
    pub extra_label: String,
    /// Pause control: "Pause" or "Resume"
    pub pause_label: String,
    /// Reset control: "Cancel" while waiting for the start time, "Reset" otherwise
    pub reset_label: String,
}

impl TimerSnapshot {
    pub fn capture(
        state: &TimerState,
        schedule: Option<&Schedule>,
        current_time: Option<NaiveTime>,
    ) -> Self {
        let in_extra = state.reached_extra_time;

        Self {
            phase: state.phase,
            paused: state.paused,
            main_remaining_seconds: state.main_remaining,
            extra_remaining_seconds: state.extra_remaining,
            main_remaining: format_hms(state.main_remaining),
            extra_remaining: format_hms(state.extra_remaining),
            severity: Severity::classify(state.main_remaining, state.configured.main_seconds),
            main_complete: state.main_complete(),
            extra_complete: state.extra_complete(),
            schedule: schedule.cloned(),
            current_time: current_time.map(format_clock_seconds),
            status_text: status_text(state, schedule),
            main_label: if in_extra { "Main Exam Time" } else { "Exam Time Remaining" }.to_string(),
            extra_label: if in_extra { "Extra Time Remaining" } else { "Extra Time Available" }
                .to_string(),
            pause_label: if state.paused { "Resume" } else { "Pause" }.to_string(),
            reset_label: if state.phase == Phase::Armed { "Cancel" } else { "Reset" }.to_string(),
        }
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::capture(&TimerState::new(), None, None)
    }
}

fn status_text(state: &TimerState, schedule: Option<&Schedule>) -> String {
    match state.phase {
        Phase::Idle => "Set a starting time and exam duration".to_string(),
        Phase::Armed => match schedule {
            Some(schedule) => format!("Exam will automatically start at {}", schedule.start),
            None => "Waiting for the starting time".to_string(),
        },
        Phase::Running | Phase::ExtraTime if state.paused => "Timer Paused".to_string(),
        Phase::Running | Phase::ExtraTime => "Timer Running".to_string(),
        Phase::Finished => "Exam finished".to_string(),
    }
}
