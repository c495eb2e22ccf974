//! Exam configuration parsing and the derived clock schedule

use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::{
    error::TimerError,
    utils::{format_clock, format_hms},
};

/// Main and extra durations captured when the timer is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Durations {
    pub main_seconds: u64,
    pub extra_seconds: u64,
}

/// A validated exam configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamConfig {
    /// Wall-clock time at which the exam starts; seconds are always zero
    pub start: NaiveTime,
    pub durations: Durations,
}

impl ExamConfig {
    /// Validate user input.
    ///
    /// The duration must be positive, extra time must not be negative, and
    /// the start time must be a valid `HH:MM`.
    pub fn new(start: &str, duration_minutes: i64, extra_minutes: i64) -> Result<Self, TimerError> {
        let start = parse_start_time(start)?;

        if duration_minutes <= 0 {
            return Err(TimerError::invalid(
                "exam duration must be a positive number of minutes",
            ));
        }
        if extra_minutes < 0 {
            return Err(TimerError::invalid("extra time cannot be negative"));
        }

        Ok(Self {
            start,
            durations: Durations {
                main_seconds: minutes_to_seconds(duration_minutes, "exam duration")?,
                extra_seconds: minutes_to_seconds(extra_minutes, "extra time")?,
            },
        })
    }

    /// Compute the clock times at which each phase ends
    pub fn schedule(&self) -> Schedule {
        let end = add_seconds(self.start, self.durations.main_seconds);
        let extra_end = add_seconds(end, self.durations.extra_seconds);

        Schedule {
            start: format_clock(self.start),
            end: format_clock(end),
            extra_end: format_clock(extra_end),
        }
    }
}

/// Clock-time strings for the start and the end of each phase (`HH:MM`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub start: String,
    pub end: String,
    pub extra_end: String,
}

/// Preview of the configuration form before the timer is armed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub start: String,
    pub duration: String,
    pub extra: String,
}

impl Preview {
    /// Build a preview from raw form inputs.
    ///
    /// Unlike [`ExamConfig::new`] nothing is rejected here: numbers
    /// that do not parse read as zero and the start time is echoed back.
    pub fn from_inputs(start: &str, duration: &str, extra: &str) -> Self {
        Self {
            start: start.trim().to_string(),
            duration: format_hms(lenient_seconds(duration)),
            extra: format_hms(lenient_seconds(extra)),
        }
    }
}

/// Parse `HH:MM` into a time of day
pub fn parse_start_time(input: &str) -> Result<NaiveTime, TimerError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimerError::invalid("a starting time is required"));
    }

    NaiveTime::parse_from_str(trimmed, "%H:%M").map_err(|_| {
        TimerError::invalid(format!("starting time '{}' is not a valid HH:MM time", trimmed))
    })
}

fn minutes_to_seconds(minutes: i64, what: &str) -> Result<u64, TimerError> {
    u64::try_from(minutes)
        .ok()
        .and_then(|m| m.checked_mul(60))
        .ok_or_else(|| TimerError::invalid(format!("{} is out of range", what)))
}

fn lenient_seconds(input: &str) -> u64 {
    input
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|m| u64::try_from(m).ok())
        .and_then(|m| m.checked_mul(60))
        .unwrap_or(0)
}

/// Add seconds to a time of day, wrapping past midnight
fn add_seconds(time: NaiveTime, seconds: u64) -> NaiveTime {
    let within_day = (seconds % 86_400) as i64;
    let (wrapped, _) = time.overflowing_add_signed(TimeDelta::seconds(within_day));
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_configuration() {
        let config = ExamConfig::new("09:00", 60, 15).unwrap();
        assert_eq!(config.start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(config.durations.main_seconds, 3600);
        assert_eq!(config.durations.extra_seconds, 900);
    }

    #[test]
    fn test_schedule() {
        let schedule = ExamConfig::new("09:00", 60, 15).unwrap().schedule();
        assert_eq!(schedule.start, "09:00");
        assert_eq!(schedule.end, "10:00");
        assert_eq!(schedule.extra_end, "10:15");
    }

    #[test]
    fn test_schedule_wraps_past_midnight() {
        let schedule = ExamConfig::new("23:30", 45, 30).unwrap().schedule();
        assert_eq!(schedule.end, "00:15");
        assert_eq!(schedule.extra_end, "00:45");
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = ExamConfig::new("09:00", 0, 15).unwrap_err();
        assert!(matches!(err, TimerError::InvalidConfiguration(_)));
        assert!(ExamConfig::new("09:00", -5, 0).is_err());
    }

    #[test]
    fn test_negative_extra_rejected() {
        assert!(ExamConfig::new("09:00", 60, -1).is_err());
    }

    #[test]
    fn test_bad_start_time_rejected() {
        assert!(ExamConfig::new("", 60, 0).is_err());
        assert!(ExamConfig::new("   ", 60, 0).is_err());
        assert!(ExamConfig::new("24:00", 60, 0).is_err());
        assert!(ExamConfig::new("09:60", 60, 0).is_err());
        assert!(ExamConfig::new("nine", 60, 0).is_err());
    }

    #[test]
    fn test_preview_is_lenient() {
        let preview = Preview::from_inputs("10:00", "120", "abc");
        assert_eq!(preview.start, "10:00");
        assert_eq!(preview.duration, "02:00:00");
        assert_eq!(preview.extra, "00:00:00");

        let preview = Preview::from_inputs("", "-3", "");
        assert_eq!(preview.duration, "00:00:00");
    }
}
