//! Error types shared across the client.

use thiserror::Error;

/// A failed call to the remote betting service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Non-success status. Displays as the raw response body, which is what
    /// the user gets to see.
    #[error("{body}")]
    Status { status: u16, body: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl RemoteError {
    /// HTTP status of the failed response, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Rejected form input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Kelly percentage must be a number between 0 and 100, got {0:?}")]
    KellyPct(String),
    #[error("Minimum stake must be a non-negative number, got {0:?}")]
    StakeMin(String),
    #[error("Maximum stake must be a number no lower than the minimum, got {0:?}")]
    StakeMax(String),
    #[error("Page limit must be a whole number above 0, got {0:?}")]
    PageLimit(String),
    #[error("Stake must be a non-negative amount, got {0:?}")]
    Stake(String),
    #[error("Hours before start must be a whole number, got {0:?}")]
    HoursBefore(String),
    #[error("Minimum edge must be a number, got {0:?}")]
    EdgeMin(String),
    #[error("Maximum edge must be a number no lower than the minimum edge, got {0:?}")]
    EdgeMax(String),
}

/// Why a row registration did not go through.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("bet {0} is already being registered")]
    InFlight(String),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Failure of a user action on the board.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error("bet {0} is no longer listed")]
    UnknownBet(String),
    #[error("could not store preferences: {0:#}")]
    Storage(anyhow::Error),
}
