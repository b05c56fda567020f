//! Dashboard: Axum web server for the betting table.
//!
//! Serves the server-rendered page, the form actions behind it and a small
//! JSON view of the current render model.

pub mod forms;
pub mod render;
pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use routes::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(routes::index))
        .route("/refresh", post(routes::refresh))
        .route("/settings", post(routes::save_settings))
        .route("/filters", post(routes::apply_filter))
        .route("/register/:kind/:bet_id", post(routes::register))
        .route("/api/board", get(routes::board_json))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

/// Serve the dashboard until `shutdown` resolves.
pub async fn serve<F>(state: AppState, addr: SocketAddr, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard to {addr}"))?;
    info!(%addr, "Dashboard listening on http://{addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Dashboard server error")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
