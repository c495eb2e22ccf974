//! Exam Timer - A state-managed HTTP server driving an exam countdown
//!
//! This is the main entry point for the exam-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use exam_timer::{
    config::Config,
    create_router,
    services::{LogAlertSink, SystemClock},
    shutdown_signal,
    state::{AppState, ExamTimer},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("exam_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting exam-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms",
          config.host, config.port, config.tick_ms);

    let timer = ExamTimer::with_period(
        Arc::new(SystemClock),
        Arc::new(LogAlertSink),
        config.tick_period(),
    );

    // Arm right away when an exam was given on the command line
    if let Some(exam) = config.initial_exam()? {
        let snapshot = timer.arm_with(exam);
        info!("Initial exam armed: {}", snapshot.status_text);
    }

    let state = Arc::new(AppState::new(timer.clone(), config.port, config.host.clone()));
    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /arm     - Set start time, duration and extra time");
    info!("  POST /pause   - Toggle pause");
    info!("  POST /resume  - Toggle pause");
    info!("  POST /reset   - Cancel or reset the timer");
    info!("  GET  /status  - Current timer snapshot");
    info!("  GET  /preview - Format inputs before arming");
    info!("  GET  /events  - Stream of timer snapshots");
    info!("  GET  /health  - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    timer.reset();
    info!("Server shutdown complete");
    Ok(())
}
