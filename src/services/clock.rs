//! Wall-clock sources

use std::{
    fmt::Debug,
    sync::{Arc, Mutex, PoisonError},
};

use chrono::{Local, NaiveTime, TimeDelta};

/// Source of the current local time of day
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> NaiveTime;
}

/// Reads the host's local time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// A clock that only moves when told to; shared between clones
#[derive(Debug, Clone)]
pub struct ManualClock {
    time: Arc<Mutex<NaiveTime>>,
}

impl ManualClock {
    pub fn new(time: NaiveTime) -> Self {
        Self {
            time: Arc::new(Mutex::new(time)),
        }
    }

    /// Create a clock at `hour:minute:second`; out-of-range values fall back to midnight
    pub fn at(hour: u32, minute: u32, second: u32) -> Self {
        Self::new(NaiveTime::from_hms_opt(hour, minute, second).unwrap_or_default())
    }

    pub fn set(&self, time: NaiveTime) {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner) = time;
    }

    /// Move the clock forward, wrapping past midnight
    pub fn advance_seconds(&self, seconds: i64) {
        let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
        let (next, _) = time.overflowing_add_signed(TimeDelta::seconds(seconds));
        *time = next;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveTime {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
