//! The exam timer controller
//!
//! Owns one [`TimerState`] together with the two periodic tasks that drive
//! it. Every command and every periodic callback goes through the same
//! mutex, so transitions never interleave. Each arm or reset starts a new
//! session; a callback from an older session is ignored even if it was
//! already running when its task was cancelled.

use std::{
    ops::ControlFlow,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use chrono::NaiveTime;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    exam_config::{ExamConfig, Schedule},
    snapshot::TimerSnapshot,
    timer_state::{Phase, TickOutcome, TimerState},
};
use crate::{
    error::TimerError,
    services::{AlertSink, Clock, PhaseAlert},
    tasks::{spawn_arming_check, spawn_countdown, PeriodicTask},
};

/// Default period of the start-time check and the countdown tick
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Inner {
    state: TimerState,
    schedule: Option<Schedule>,
    current_time: Option<NaiveTime>,
    session: u64,
    arming_check: PeriodicTask,
    countdown: PeriodicTask,
}

/// Which periodic tasks are currently alive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTasks {
    pub arming_check: bool,
    pub countdown: bool,
}

#[derive(Debug)]
struct Shared {
    inner: Mutex<Inner>,
    clock: Arc<dyn Clock>,
    alerts: Arc<dyn AlertSink>,
    period: Duration,
    updates: watch::Sender<TimerSnapshot>,
}

/// Handle to one exam timer; clones share the same timer.
///
/// Dropping the last handle aborts any periodic task still running.
#[derive(Debug, Clone)]
pub struct ExamTimer {
    shared: Arc<Shared>,
}

/// Handle held by the periodic tasks; does not keep the timer alive
#[derive(Debug, Clone)]
pub struct WeakTimer {
    shared: Weak<Shared>,
}

impl WeakTimer {
    /// The timer, unless every [`ExamTimer`] handle has been dropped
    pub fn upgrade(&self) -> Option<ExamTimer> {
        self.shared.upgrade().map(|shared| ExamTimer { shared })
    }
}

impl ExamTimer {
    /// Create an idle timer
    pub fn new(clock: Arc<dyn Clock>, alerts: Arc<dyn AlertSink>) -> Self {
        Self::with_period(clock, alerts, DEFAULT_PERIOD)
    }

    /// Create an idle timer whose periodic tasks fire every `period`
    pub fn with_period(clock: Arc<dyn Clock>, alerts: Arc<dyn AlertSink>, period: Duration) -> Self {
        let (updates, _) = watch::channel(TimerSnapshot::default());

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: TimerState::new(),
                    schedule: None,
                    current_time: None,
                    session: 0,
                    arming_check: PeriodicTask::new(),
                    countdown: PeriodicTask::new(),
                }),
                clock,
                alerts,
                period,
                updates,
            }),
        }
    }

    /// Configure the exam and wait for its start time.
    ///
    /// On error nothing changes. On success any running check or countdown
    /// is cancelled first, the clock is checked once right away, and a
    /// periodic check is started if the exam did not start immediately.
    pub fn arm(
        &self,
        start: &str,
        duration_minutes: i64,
        extra_minutes: i64,
    ) -> Result<TimerSnapshot, TimerError> {
        let config = ExamConfig::new(start, duration_minutes, extra_minutes)?;
        Ok(self.arm_with(config))
    }

    /// Arm with an already validated configuration
    pub fn arm_with(&self, config: ExamConfig) -> TimerSnapshot {
        let mut inner = self.lock();
        self.cancel_tasks(&mut inner);
        inner.session += 1;

        inner.state.arm(&config);
        inner.schedule = Some(config.schedule());
        info!(
            "Timer armed: start={}, duration={}s, extra={}s",
            config.start.format("%H:%M"),
            config.durations.main_seconds,
            config.durations.extra_seconds
        );

        let started = self.check_start_time_locked(&mut inner);
        if !started {
            let handle = spawn_arming_check(self.downgrade(), inner.session, self.shared.period);
            inner.arming_check.replace(handle);
        }

        let snapshot = self.publish(&inner);
        drop(inner);

        if started {
            self.shared.alerts.alert(PhaseAlert::ExamStarted);
        }
        snapshot
    }

    /// Compare the wall clock against the armed start time, starting the
    /// exam when they match. Returns whether the exam started.
    pub fn check_start_time(&self) -> bool {
        let mut inner = self.lock();
        let started = self.check_start_time_locked(&mut inner);
        self.publish(&inner);
        drop(inner);

        if started {
            self.shared.alerts.alert(PhaseAlert::ExamStarted);
        }
        started
    }

    /// Periodic start-time check bound to `session`
    pub(crate) fn check_start_time_for(&self, session: u64) -> ControlFlow<()> {
        let mut inner = self.lock();
        if inner.session != session || inner.state.phase != Phase::Armed {
            return ControlFlow::Break(());
        }

        let started = self.check_start_time_locked(&mut inner);
        self.publish(&inner);
        drop(inner);

        if started {
            self.shared.alerts.alert(PhaseAlert::ExamStarted);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    /// Start the countdown now. Does nothing unless armed.
    pub fn start(&self) -> bool {
        let mut inner = self.lock();
        inner.arming_check.cancel();
        let started = self.start_locked(&mut inner);
        self.publish(&inner);
        drop(inner);

        if started {
            self.shared.alerts.alert(PhaseAlert::ExamStarted);
        }
        started
    }

    /// Advance the countdown by one second.
    ///
    /// The wall-clock display is refreshed before the counters move, and the
    /// new state is published before this returns.
    pub fn tick(&self) -> TickOutcome {
        let mut inner = self.lock();
        let outcome = self.tick_locked(&mut inner);
        self.publish(&inner);
        drop(inner);

        self.alert_for(outcome);
        outcome
    }

    /// Periodic tick bound to `session`
    pub(crate) fn tick_for(&self, session: u64) -> ControlFlow<()> {
        let mut inner = self.lock();
        if inner.session != session || !inner.state.phase.is_counting() {
            return ControlFlow::Break(());
        }

        let outcome = self.tick_locked(&mut inner);
        self.publish(&inner);
        drop(inner);

        self.alert_for(outcome);
        if outcome.stops_countdown() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    /// Toggle the paused flag. Only has an effect while counting.
    pub fn toggle_pause(&self) -> TimerSnapshot {
        let mut inner = self.lock();
        if inner.state.phase.is_counting() {
            let paused = inner.state.toggle_pause();
            info!("Timer {}", if paused { "paused" } else { "resumed" });
        } else {
            warn!("Ignoring pause toggle in phase {:?}", inner.state.phase);
        }
        self.publish(&inner)
    }

    /// Same toggle as [`ExamTimer::toggle_pause`]
    pub fn pause(&self) -> TimerSnapshot {
        self.toggle_pause()
    }

    /// Same toggle as [`ExamTimer::toggle_pause`]
    pub fn resume(&self) -> TimerSnapshot {
        self.toggle_pause()
    }

    /// Cancel all periodic work and return to idle
    pub fn reset(&self) -> TimerSnapshot {
        let mut inner = self.lock();
        self.cancel_tasks(&mut inner);
        inner.session += 1;

        inner.state.reset();
        inner.schedule = None;
        info!("Timer reset");
        self.publish(&inner)
    }

    /// Current state as a display snapshot
    pub fn snapshot(&self) -> TimerSnapshot {
        let inner = self.lock();
        Self::capture(&inner)
    }

    /// Copy of the raw timer state
    pub fn state(&self) -> TimerState {
        self.lock().state.clone()
    }

    pub fn active_tasks(&self) -> ActiveTasks {
        let inner = self.lock();
        ActiveTasks {
            arming_check: inner.arming_check.is_active(),
            countdown: inner.countdown.is_active(),
        }
    }

    /// Receive a snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Weak handle for the periodic tasks
    pub fn downgrade(&self) -> WeakTimer {
        WeakTimer {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Overwrite the raw state. Test and diagnostic hook only.
    ///
    /// Bypasses every transition rule: no tasks are started or stopped, so a
    /// restored Running state has no countdown unless one was already alive.
    /// Drive it with [`ExamTimer::tick`].
    #[doc(hidden)]
    pub fn restore(&self, state: TimerState) -> TimerSnapshot {
        let mut inner = self.lock();
        inner.state = state;
        self.publish(&inner)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State is consistent after every transition, poisoned or not
        self.shared.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_tasks(&self, inner: &mut Inner) {
        inner.arming_check.cancel();
        inner.countdown.cancel();
    }

    fn check_start_time_locked(&self, inner: &mut Inner) -> bool {
        let now = self.shared.clock.now();
        inner.current_time = Some(now);

        if !inner.state.start_time_reached(now) {
            debug!("Start time not reached at {}", now.format("%H:%M:%S"));
            return false;
        }

        // Stop checking before starting so the start fires once per armed window
        inner.arming_check.cancel();
        self.start_locked(inner)
    }

    fn start_locked(&self, inner: &mut Inner) -> bool {
        if !inner.state.start() {
            warn!("Ignoring start in phase {:?}", inner.state.phase);
            return false;
        }

        info!(
            "Exam started: main={}s, extra={}s",
            inner.state.main_remaining, inner.state.extra_remaining
        );
        let handle = spawn_countdown(self.downgrade(), inner.session, self.shared.period);
        inner.countdown.replace(handle);
        true
    }

    fn tick_locked(&self, inner: &mut Inner) -> TickOutcome {
        inner.current_time = Some(self.shared.clock.now());

        let outcome = inner.state.tick();
        match outcome {
            TickOutcome::Inactive | TickOutcome::Paused => {}
            TickOutcome::Counted => debug!(
                "Tick: main={}s, extra={}s",
                inner.state.main_remaining, inner.state.extra_remaining
            ),
            TickOutcome::MainComplete => info!(
                "Main exam time complete, extra time {}s",
                inner.state.extra_remaining
            ),
            TickOutcome::ExtraComplete => info!("Extra time complete, exam finished"),
            TickOutcome::ForcedFinish => warn!(
                "Countdown reached an inconsistent state (main={}s, extra={}s), forcing finish",
                inner.state.main_remaining, inner.state.extra_remaining
            ),
        }

        if outcome.stops_countdown() {
            inner.countdown.cancel();
        }
        outcome
    }

    fn alert_for(&self, outcome: TickOutcome) {
        let alert = match outcome {
            TickOutcome::MainComplete => PhaseAlert::MainTimeComplete,
            TickOutcome::ExtraComplete => PhaseAlert::ExtraTimeComplete,
            TickOutcome::ForcedFinish => PhaseAlert::ForcedStop,
            _ => return,
        };
        self.shared.alerts.alert(alert);
    }

    fn capture(inner: &Inner) -> TimerSnapshot {
        TimerSnapshot::capture(&inner.state, inner.schedule.as_ref(), inner.current_time)
    }

    fn publish(&self, inner: &Inner) -> TimerSnapshot {
        let snapshot = Self::capture(inner);
        self.shared.updates.send_replace(snapshot.clone());
        snapshot
    }
}
