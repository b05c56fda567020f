//! Remote betting service.
//!
//! Defines the `BettingService` trait the rest of the client talks to, and
//! the reqwest-backed implementation in [`http`]. The service owns the
//! sizing settings, the bet feed and registration persistence.

pub mod http;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::error::RemoteError;
use crate::types::{Bet, BetFilter, HealthStatus, Registration, RemoteSettings};

/// Abstraction over the remote betting API.
///
/// Every method maps to one HTTP call. A non-success status is returned as
/// [`RemoteError::Status`] carrying the raw response body.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BettingService: Send + Sync {
    /// `GET /settings`
    async fn fetch_settings(&self) -> Result<RemoteSettings, RemoteError>;

    /// `POST /settings` with the four remote-owned fields.
    async fn save_settings(&self, settings: &RemoteSettings) -> Result<(), RemoteError>;

    /// `GET /bets`, bounded server-side by the page limit.
    async fn fetch_bets(&self, filter: &BetFilter) -> Result<Vec<Bet>, RemoteError>;

    /// `POST /register`
    async fn register(&self, registration: &Registration) -> Result<(), RemoteError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus, RemoteError>;

    /// `GET /sports`: sport names the feed can be filtered on.
    async fn list_sports(&self) -> Result<Vec<String>, RemoteError>;

    /// `GET /bookmakers`: bookmaker names the feed can be filtered on.
    async fn list_bookmakers(&self) -> Result<Vec<String>, RemoteError>;

    /// Base address, for logs and connectivity advice.
    fn base_url(&self) -> &str;
}
