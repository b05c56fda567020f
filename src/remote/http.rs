//! HTTP client for the remote betting API.
//!
//! Endpoints (all relative to the configured base address):
//! - `GET  /settings` → `{kelly_fraction, stake_min, stake_max, page_limit}`
//! - `POST /settings` with the same body, response body ignored
//! - `GET  /bets` → array of bets, optional filter query
//! - `POST /register` with `{bet_id, stake}`, response body ignored
//! - `GET  /health` → `{status, time}`
//! - `GET  /sports`, `GET /bookmakers` → sorted name lists

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::BettingService;
use crate::error::RemoteError;
use crate::types::{Bet, BetFilter, HealthStatus, Registration, RemoteSettings};

/// reqwest-backed betting service client.
pub struct HttpBettingService {
    http: Client,
    base_url: String,
}

impl HttpBettingService {
    /// Create a client for the service at `base_url`.
    ///
    /// No request timeout is applied unless one is given.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent("stakeboard/0.1.0");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("Failed to build HTTP client for the betting service")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    // -- Internal helpers ------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Turn a non-success status into `RemoteError::Status` with the body.
    async fn check(resp: Response) -> Result<Response, RemoteError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(status = status.as_u16(), error = %e, "Could not read error body");
                String::new()
            }
        };
        Err(RemoteError::Status {
            status: status.as_u16(),
            body: error_message(status, body),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let url = self.url(path);
        debug!(url = %url, "GET");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                url: url.clone(),
                source,
            })?;

        Self::check(resp)
            .await?
            .json()
            .await
            .map_err(|source| RemoteError::Decode { url, source })
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), RemoteError> {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                url: url.clone(),
                source,
            })?;

        Self::check(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl BettingService for HttpBettingService {
    async fn fetch_settings(&self) -> Result<RemoteSettings, RemoteError> {
        self.get_json("/settings").await
    }

    async fn save_settings(&self, settings: &RemoteSettings) -> Result<(), RemoteError> {
        self.post_json("/settings", settings).await
    }

    async fn fetch_bets(&self, filter: &BetFilter) -> Result<Vec<Bet>, RemoteError> {
        self.get_json(&format!("/bets{}", filter.to_query())).await
    }

    async fn register(&self, registration: &Registration) -> Result<(), RemoteError> {
        self.post_json("/register", registration).await
    }

    async fn health(&self) -> Result<HealthStatus, RemoteError> {
        self.get_json("/health").await
    }

    async fn list_sports(&self) -> Result<Vec<String>, RemoteError> {
        self.get_json("/sports").await
    }

    async fn list_bookmakers(&self) -> Result<Vec<String>, RemoteError> {
        self.get_json("/bookmakers").await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// The raw body, or the status's reason phrase when there is nothing to show.
fn error_message(status: StatusCode, body: String) -> String {
    if !body.trim().is_empty() {
        return body;
    }
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => format!("HTTP {}", status.as_u16()),
    }
}
