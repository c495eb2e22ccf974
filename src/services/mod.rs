//! External collaborators of the timer engine
//!
//! The wall clock it polls and the alert hook it notifies on transitions.

pub mod alerts;
pub mod clock;

pub use alerts::{AlertSink, LogAlertSink, PhaseAlert};
pub use clock::{Clock, ManualClock, SystemClock};
