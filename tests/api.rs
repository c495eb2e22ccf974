//! HTTP API tests against the router, without binding a socket

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use exam_timer::{
    create_router,
    services::{LogAlertSink, ManualClock},
    state::{AppState, ExamTimer},
};
use futures::{Stream, StreamExt};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app_at(hour: u32, minute: u32) -> (Router, Arc<AppState>) {
    let timer = ExamTimer::new(
        Arc::new(ManualClock::at(hour, minute, 0)),
        Arc::new(LogAlertSink),
    );
    let state = Arc::new(AppState::new(timer, 20554, "127.0.0.1".to_string()));
    (create_router(Arc::clone(&state)), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _state) = app_at(8, 0);
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn arm_before_start_time_waits() {
    let (app, state) = app_at(8, 0);
    let request = post_json(
        "/arm",
        json!({ "start": "09:00", "duration_minutes": 60, "extra_minutes": 15 }),
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Exam will automatically start at 09:00");
    assert_eq!(body["timer"]["phase"], "armed");
    assert_eq!(body["timer"]["main_remaining"], "01:00:00");
    assert_eq!(body["timer"]["schedule"]["end"], "10:00");
    assert_eq!(body["timer"]["schedule"]["extra_end"], "10:15");

    state.timer.reset();
}

#[tokio::test]
async fn arm_with_zero_duration_is_rejected() {
    let (app, _state) = app_at(8, 0);
    let request = post_json("/arm", json!({ "start": "09:00", "duration_minutes": 0 }));
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
    assert_eq!(body["timer"]["phase"], "idle");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid configuration"));
}

#[tokio::test]
async fn pause_and_resume_toggle() {
    let (app, state) = app_at(9, 0);
    let request = post_json("/arm", json!({ "start": "09:00", "duration_minutes": 60 }));
    let (_, body) = send(&app, request).await;
    assert_eq!(body["timer"]["phase"], "running");
    assert_eq!(body["message"], "Exam started");

    let (_, body) = send(&app, post("/pause")).await;
    assert_eq!(body["timer"]["paused"], true);
    assert_eq!(body["message"], "Timer paused");

    let (_, body) = send(&app, post("/resume")).await;
    assert_eq!(body["timer"]["paused"], false);
    assert_eq!(body["message"], "Timer resumed");

    state.timer.reset();
}

#[tokio::test]
async fn pause_while_idle_is_ignored() {
    let (app, _state) = app_at(9, 0);
    let (status, body) = send(&app, post("/pause")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Timer is not running");
    assert_eq!(body["timer"]["paused"], false);
}

#[tokio::test]
async fn reset_returns_to_idle_and_is_reported_in_status() {
    let (app, state) = app_at(9, 0);
    let request = post_json("/arm", json!({ "start": "09:00", "duration_minutes": 60 }));
    send(&app, request).await;

    let (_, body) = send(&app, post("/reset")).await;
    assert_eq!(body["timer"]["phase"], "idle");
    assert_eq!(body["timer"]["main_remaining_seconds"], 0);
    assert!(!state.timer.active_tasks().countdown);

    let (status, body) = send(&app, get("/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_action"], "reset");
    assert_eq!(body["port"], 20554);
    assert_eq!(body["timer"]["phase"], "idle");
}

#[tokio::test]
async fn preview_formats_form_inputs() {
    let (app, _state) = app_at(9, 0);
    let (status, body) = send(&app, get("/preview?start=10:30&duration=90&extra=abc")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["start"], "10:30");
    assert_eq!(body["duration"], "01:30:00");
    assert_eq!(body["extra"], "00:00:00");
}

/// Read one server-sent event and return its name and JSON payload
async fn next_event<S, E>(body: &mut S, buffer: &mut String) -> (String, Value)
where
    S: Stream<Item = Result<axum::body::Bytes, E>> + Unpin,
    E: std::fmt::Debug,
{
    while !buffer.contains("\n\n") {
        let chunk = body.next().await.unwrap().unwrap();
        buffer.push_str(std::str::from_utf8(&chunk).unwrap());
    }

    let end = buffer.find("\n\n").unwrap();
    let frame: String = buffer.drain(..end + 2).collect();
    let mut name = String::new();
    let mut data = String::new();
    for line in frame.lines() {
        if let Some(value) = line.strip_prefix("event:") {
            name = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("data:") {
            data.push_str(value.trim_start());
        }
    }
    (name, serde_json::from_str(&data).unwrap())
}

#[tokio::test]
async fn events_stream_sends_current_snapshot_then_changes() {
    let (app, state) = app_at(8, 0);
    let response = app.clone().oneshot(get("/events")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let mut body = response.into_body().into_data_stream();
    let mut buffer = String::new();

    let (name, snapshot) = next_event(&mut body, &mut buffer).await;
    assert_eq!(name, "timer");
    assert_eq!(snapshot["phase"], "idle");
    assert_eq!(snapshot["reset_label"], "Reset");

    let request = post_json("/arm", json!({ "start": "09:00", "duration_minutes": 60 }));
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let (name, snapshot) = next_event(&mut body, &mut buffer).await;
    assert_eq!(name, "timer");
    assert_eq!(snapshot["phase"], "armed");
    assert_eq!(snapshot["main_remaining"], "01:00:00");
    assert_eq!(snapshot["reset_label"], "Cancel");

    state.timer.reset();
}
