//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TimerSnapshot;

/// Body of POST /arm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmRequest {
    /// Start time as `HH:MM`
    pub start: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub extra_minutes: i64,
}

/// Query of GET /preview; every field is optional raw form text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviewQuery {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub extra: String,
}

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    pub fn ok(message: String, timer: TimerSnapshot) -> Self {
        Self::new("ok", message, timer)
    }

    /// Create an error response carrying the unchanged timer
    pub fn error(message: String, timer: TimerSnapshot) -> Self {
        Self::new("error", message, timer)
    }
}

/// Status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
