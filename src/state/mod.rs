//! State management module
//!
//! The timer's state machine, its controller, and the server-level state
//! shared with the HTTP handlers.

pub mod app_state;
pub mod exam_config;
pub mod exam_timer;
pub mod snapshot;
pub mod timer_state;

pub use app_state::AppState;
pub use exam_config::{Durations, ExamConfig, Preview, Schedule};
pub use exam_timer::{ActiveTasks, ExamTimer, WeakTimer, DEFAULT_PERIOD};
pub use snapshot::TimerSnapshot;
pub use timer_state::{Phase, TickOutcome, TimerState};
