//! HTTP API for OurJourney.
//!
//! # Responsibility
//! - Expose custody queries, calendar views and journal entries as JSON
//!   endpoints.
//! - Own the listener lifecycle and request logging.
//!
//! # Invariants
//! - Dates cross this boundary only as `YYYY-MM-DD` strings.
//! - Handlers hold no shared mutable state beyond the read-only config.

pub mod config;
pub mod error;
pub mod handlers;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::Router;
use log::info;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

pub use config::{ConfigError, CustodyConfig, LogConfig, ServerConfig};
pub use error::{ApiError, ApiErrorCode};

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/custody/status/:date", get(handlers::custody_status))
        .route("/api/custody/range", get(handlers::custody_range))
        .route(
            "/api/custody/next-date-nights",
            get(handlers::next_date_nights),
        )
        .route(
            "/api/calendar/month/:year/:month",
            get(handlers::calendar_month),
        )
        .route("/api/calendar/day/:date", get(handlers::calendar_day))
        .route("/api/calendar/event", post(handlers::create_calendar_event))
        .route(
            "/api/entries",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route("/api/entries/:id", put(handlers::update_entry))
        .route("/api/entries/:id/complete", post(handlers::complete_entry))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

/// Binds `config.bind` and serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(&config.bind).await?;
    info!(
        "event=server_start module=server status=ok bind={} db_path={}",
        listener.local_addr()?,
        config.db_path.display()
    );

    let app = build_router(AppState::new(config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn log_requests(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    info!(
        "event=http_request module=server method={} path={} status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}
