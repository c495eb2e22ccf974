//! Background tasks module
//!
//! The two periodic tasks that drive the timer: the start-time check while
//! armed, and the countdown tick while running. Each is owned through a
//! [`PeriodicTask`] handle stored in the timer.

pub mod arming_check;
pub mod countdown;

use tokio::task::JoinHandle;

pub use arming_check::spawn_arming_check;
pub use countdown::spawn_countdown;

/// Cancelable handle to a spawned periodic task
#[derive(Debug, Default)]
pub struct PeriodicTask {
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly spawned task, cancelling any previous one
    pub fn replace(&mut self, handle: JoinHandle<()>) {
        self.cancel();
        self.handle = Some(handle);
    }

    /// Abort the task. Cancelling an absent or finished task is a no-op.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
