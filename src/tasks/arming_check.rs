//! Start-time check while the timer is armed

use std::{ops::ControlFlow, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::state::WeakTimer;

/// Poll the wall clock every `period` until the armed start time is reached.
///
/// The first check runs one period after spawning; [`crate::state::ExamTimer::arm`]
/// does the immediate one itself. The task ends when the timer starts, when
/// `session` is no longer current, or when the timer has been dropped.
pub fn spawn_arming_check(weak: WeakTimer, session: u64, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Arming check started for session {}", session);

        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let Some(timer) = weak.upgrade() else {
                debug!("Timer dropped, stopping arming check for session {}", session);
                break;
            };
            if let ControlFlow::Break(()) = timer.check_start_time_for(session) {
                break;
            }
        }

        debug!("Arming check for session {} finished", session);
    })
}
