//! HTTP API module
//!
//! The control and display surface of the exam timer.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/arm", post(arm_handler))
        .route("/pause", post(toggle_pause_handler))
        .route("/resume", post(toggle_pause_handler))
        .route("/reset", post(reset_handler))
        .route("/status", get(status_handler))
        .route("/preview", get(preview_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
