//! Stakeboard: betting-opportunity dashboard.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! checks the betting service, performs the initial load and serves the
//! dashboard until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use stakeboard::config;
use stakeboard::dashboard;
use stakeboard::engine::Board;
use stakeboard::remote::http::HttpBettingService;
use stakeboard::remote::BettingService;
use stakeboard::storage::PreferenceStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let cfg = config::AppConfig::load(&config_path)?;

    init_logging();

    info!(
        api = %cfg.remote.base_url,
        dashboard = %cfg.dashboard.addr(),
        prefs = %cfg.preferences.path,
        "Stakeboard starting up"
    );

    let service = Arc::new(HttpBettingService::new(
        &cfg.remote.base_url,
        cfg.remote.request_timeout(),
    )?);

    match service.health().await {
        Ok(health) => info!(status = %health.status, time = ?health.time, "Betting service reachable"),
        Err(e) => warn!(error = %e, "Betting service health check failed"),
    }

    let board = Arc::new(Board::new(
        service,
        PreferenceStore::new(&cfg.preferences.path),
        cfg.filters.clone(),
    ));
    board.start().await;

    dashboard::serve(Arc::clone(&board), cfg.dashboard.addr(), shutdown_signal()).await?;

    board.shutdown().await;
    info!("Stakeboard shut down cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stakeboard=info"));

    let json_logging = std::env::var("STAKEBOARD_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
