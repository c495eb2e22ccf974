//! Countdown tick while the exam is running

use std::{ops::ControlFlow, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::state::WeakTimer;

/// Tick the countdown every `period`, starting one period from now.
///
/// Missed ticks are delayed, not burst: one decrement per wakeup.
pub fn spawn_countdown(weak: WeakTimer, session: u64, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Countdown started for session {}", session);

        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let Some(timer) = weak.upgrade() else {
                debug!("Timer dropped, stopping countdown for session {}", session);
                break;
            };
            if let ControlFlow::Break(()) = timer.tick_for(session) {
                break;
            }
        }

        debug!("Countdown for session {} finished", session);
    })
}
