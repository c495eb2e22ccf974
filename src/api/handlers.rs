//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{info, warn};

use crate::state::{AppState, Phase, Preview};
use super::responses::{ApiResponse, ArmRequest, HealthResponse, PreviewQuery, StatusResponse};

/// Handle POST /arm - Configure the exam and wait for its start time
pub async fn arm_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ArmRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    state.record_action("arm");

    match state.timer.arm(&request.start, request.duration_minutes, request.extra_minutes) {
        Ok(timer) => {
            let message = match timer.phase {
                Phase::Armed => format!("Exam will automatically start at {}", request.start.trim()),
                _ => "Exam started".to_string(),
            };
            info!("Arm endpoint called - {}", message);
            (StatusCode::OK, Json(ApiResponse::ok(message, timer)))
        }
        Err(e) => {
            warn!("Rejected arm request: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::error(
                    format!("{}. Please set a valid Starting Time and Exam Duration.", e),
                    state.timer.snapshot(),
                )),
            )
        }
    }
}

/// Handle POST /pause and POST /resume - Toggle the paused flag
pub async fn toggle_pause_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.record_action("toggle-pause");

    let timer = state.timer.toggle_pause();
    let message = if !timer.phase.is_counting() {
        "Timer is not running".to_string()
    } else if timer.paused {
        "Timer paused".to_string()
    } else {
        "Timer resumed".to_string()
    };
    Json(ApiResponse::ok(message, timer))
}

/// Handle POST /reset - Cancel a pending start or stop the exam
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    state.record_action("reset");

    let timer = state.timer.reset();
    info!("Reset endpoint called - timer is idle");
    Json(ApiResponse::ok("Timer reset".to_string(), timer))
}

/// Handle GET /status - Return the timer snapshot and server metadata
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.timer.snapshot(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /preview - Format form inputs before arming
pub async fn preview_handler(Query(query): Query<PreviewQuery>) -> Json<Preview> {
    Json(Preview::from_inputs(&query.start, &query.duration, &query.extra))
}

/// Handle GET /events - Stream a snapshot after every timer change
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let updates = state.timer.subscribe();

    // First item is the current snapshot, then one per change
    let stream = stream::unfold((updates, true), |(mut updates, first)| async move {
        if !first && updates.changed().await.is_err() {
            return None;
        }

        let snapshot = updates.borrow_and_update().clone();
        let event = match serde_json::to_string(&snapshot) {
            Ok(data) => Event::default().event("timer").data(data),
            Err(e) => {
                warn!("Failed to serialize timer snapshot: {}", e);
                Event::default().event("error").data(e.to_string())
            }
        };
        Some((Ok(event), (updates, false)))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
