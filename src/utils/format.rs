//! Display formatting for counters, clock times and the remaining-time severity

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Format whole seconds as `HH:MM:SS`.
///
/// Hours are not wrapped, so an exam longer than a day shows e.g. `25:00:00`.
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Format a time of day as `HH:MM`
pub fn format_clock(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Format a time of day as `HH:MM:SS`
pub fn format_clock_seconds(time: NaiveTime) -> String {
    format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())
}

/// How much of the main exam time is left, used for display coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// More than half of the exam time remains
    High,
    /// More than a fifth remains
    Medium,
    /// A fifth or less remains
    Low,
}

impl Severity {
    /// Classify `main_remaining` against the configured `main_seconds`.
    ///
    /// A zero `main_seconds` counts as 0% and classifies as [`Severity::Low`].
    pub fn classify(main_remaining: u64, main_seconds: u64) -> Self {
        if main_seconds == 0 {
            return Severity::Low;
        }

        // percentage > N  <=>  remaining * 100 > N * total, without rounding
        let scaled = u128::from(main_remaining) * 100;
        let total = u128::from(main_seconds);
        if scaled > 50 * total {
            Severity::High
        } else if scaled > 20 * total {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3600), "01:00:00");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(90_000), "25:00:00");
    }

    #[test]
    fn test_format_clock() {
        let time = NaiveTime::from_hms_opt(9, 5, 7).unwrap();
        assert_eq!(format_clock(time), "09:05");
        assert_eq!(format_clock_seconds(time), "09:05:07");
    }

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(Severity::classify(3600, 3600), Severity::High);
        assert_eq!(Severity::classify(1801, 3600), Severity::High);
        // exactly 50% is not "more than half"
        assert_eq!(Severity::classify(1800, 3600), Severity::Medium);
        assert_eq!(Severity::classify(721, 3600), Severity::Medium);
        // exactly 20%
        assert_eq!(Severity::classify(720, 3600), Severity::Low);
        assert_eq!(Severity::classify(0, 3600), Severity::Low);
    }

    #[test]
    fn test_severity_without_configured_duration() {
        assert_eq!(Severity::classify(0, 0), Severity::Low);
        assert_eq!(Severity::classify(10, 0), Severity::Low);
    }
}
