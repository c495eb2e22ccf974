//! Exam timer state and its transition rules
//!
//! ```text
//!          arm()             clock == target        main hits 0         extra hits 0
//!  Idle ──────────► Armed ──────────────────► Running ─────────► ExtraTime ─────────► Finished
//!   ▲                                            │                                       ▲
//!   │                                            └──── tick() with main == 0 (invalid) ──┘
//!   └──────────────────────────── reset() from any phase ─────────────────────────────────
//! ```
//!
//! Everything here is synchronous and clock-free; scheduling lives in
//! [`crate::state::ExamTimer`].

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::exam_config::{Durations, ExamConfig};

/// Lifecycle phase of the exam timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Armed,
    Running,
    ExtraTime,
    Finished,
}

impl Phase {
    /// Whether the countdown is active in this phase
    pub fn is_counting(self) -> bool {
        matches!(self, Phase::Running | Phase::ExtraTime)
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown is active in the current phase
    Inactive,
    /// Paused; counters untouched
    Paused,
    /// A counter was decremented without a phase change
    Counted,
    /// Main time ran out; now in extra time
    MainComplete,
    /// Extra time ran out; now finished
    ExtraComplete,
    /// The state was inconsistent and the session was forced to finish
    ForcedFinish,
}

impl TickOutcome {
    /// Whether the countdown should stop ticking after this outcome
    pub fn stops_countdown(self) -> bool {
        matches!(self, TickOutcome::ExtraComplete | TickOutcome::ForcedFinish)
    }
}

/// Counters and phase of one exam timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub phase: Phase,
    pub paused: bool,
    pub main_remaining: u64,
    pub extra_remaining: u64,
    /// Start time waited on while armed
    pub target: Option<NaiveTime>,
    /// Durations captured when armed
    pub configured: Durations,
    /// Set when main time ran out on a tick, never by a forced finish
    pub reached_extra_time: bool,
}

impl TimerState {
    /// Create a new idle timer state
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            paused: false,
            main_remaining: 0,
            extra_remaining: 0,
            target: None,
            configured: Durations::default(),
            reached_extra_time: false,
        }
    }

    /// Store the configuration and wait for the start time.
    ///
    /// The counters are pre-loaded so the armed display shows the full
    /// durations.
    pub fn arm(&mut self, config: &ExamConfig) {
        *self = Self {
            phase: Phase::Armed,
            paused: false,
            main_remaining: config.durations.main_seconds,
            extra_remaining: config.durations.extra_seconds,
            target: Some(config.start),
            configured: config.durations,
            reached_extra_time: false,
        };
    }

    /// Whether `now` falls in the armed target minute
    pub fn start_time_reached(&self, now: NaiveTime) -> bool {
        use chrono::Timelike;

        match (self.phase, self.target) {
            (Phase::Armed, Some(target)) => {
                now.hour() == target.hour() && now.minute() == target.minute()
            }
            _ => false,
        }
    }

    /// Begin the main countdown. Returns false unless armed.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Armed {
            return false;
        }

        self.phase = Phase::Running;
        self.paused = false;
        self.main_remaining = self.configured.main_seconds;
        self.extra_remaining = self.configured.extra_seconds;
        true
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.phase.is_counting() {
            return TickOutcome::Inactive;
        }
        if self.paused {
            return TickOutcome::Paused;
        }

        match self.phase {
            Phase::Running if self.main_remaining > 0 => {
                self.main_remaining -= 1;
                if self.main_remaining == 0 {
                    // Main time is complete even when there is no extra time
                    self.phase = Phase::ExtraTime;
                    self.reached_extra_time = true;
                    TickOutcome::MainComplete
                } else {
                    TickOutcome::Counted
                }
            }
            Phase::ExtraTime => {
                // Entered with zero extra time: finish on the next tick
                self.extra_remaining = self.extra_remaining.saturating_sub(1);
                if self.extra_remaining == 0 {
                    self.phase = Phase::Finished;
                    TickOutcome::ExtraComplete
                } else {
                    TickOutcome::Counted
                }
            }
            _ => {
                self.phase = Phase::Finished;
                self.paused = false;
                TickOutcome::ForcedFinish
            }
        }
    }

    /// Flip the paused flag while counting. Returns the new value.
    pub fn toggle_pause(&mut self) -> bool {
        if self.phase.is_counting() {
            self.paused = !self.paused;
        }
        self.paused
    }

    /// Return to idle, discarding counters and configuration
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Main time has run out and the exam moved into extra time
    pub fn main_complete(&self) -> bool {
        self.reached_extra_time && self.main_remaining == 0
    }

    /// Extra time has run out
    pub fn extra_complete(&self) -> bool {
        self.reached_extra_time && self.extra_remaining == 0
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
