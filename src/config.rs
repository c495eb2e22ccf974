//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::{error::TimerError, state::ExamConfig};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "exam-timer")]
#[command(about = "An exam countdown server with automatic start and extra time")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Arm the timer at startup with this start time (HH:MM)
    #[arg(long, requires = "duration")]
    pub start: Option<String>,

    /// Exam duration in minutes, used with --start
    #[arg(short, long, requires = "start")]
    pub duration: Option<i64>,

    /// Extra time in minutes, used with --start
    #[arg(short, long, default_value = "0")]
    pub extra: i64,

    /// Period of the start-time check and countdown tick, in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// The exam to arm at startup, if one was given
    pub fn initial_exam(&self) -> Result<Option<ExamConfig>, TimerError> {
        match (&self.start, self.duration) {
            (Some(start), Some(duration)) => ExamConfig::new(start, duration, self.extra).map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["exam-timer"]).unwrap();
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.tick_period(), Duration::from_secs(1));
        assert_eq!(config.initial_exam(), Ok(None));
    }

    #[test]
    fn test_initial_exam() {
        let config = Config::try_parse_from([
            "exam-timer", "--start", "09:00", "--duration", "60", "--extra", "15", "-v",
        ])
        .unwrap();
        let exam = config.initial_exam().unwrap().unwrap();
        assert_eq!(exam.durations.main_seconds, 3600);
        assert_eq!(exam.durations.extra_seconds, 900);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_start_requires_duration() {
        assert!(Config::try_parse_from(["exam-timer", "--start", "09:00"]).is_err());
    }

    #[test]
    fn test_invalid_initial_exam() {
        let config =
            Config::try_parse_from(["exam-timer", "--start", "09:00", "--duration", "0"]).unwrap();
        assert!(config.initial_exam().is_err());
    }

    #[test]
    fn test_zero_tick_rejected() {
        assert!(Config::try_parse_from(["exam-timer", "--tick-ms", "0"]).is_err());
    }
}
