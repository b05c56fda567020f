//! Per-row stake registration.
//!
//! A bet id is marked in flight from the moment its POST starts. A second
//! submission for the same id is refused while the mark is held. Other ids
//! are unaffected. On success the caller receives the mark as a
//! [`RowClaim`] and decides when the row is free again.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

use crate::error::RegistrationError;
use crate::remote::BettingService;
use crate::types::{BetId, Registration};

pub struct Registrar {
    service: Arc<dyn BettingService>,
    in_flight: Mutex<HashSet<BetId>>,
}

/// In-flight mark for one row. Dropping it releases the row.
#[must_use = "the row is released as soon as the claim is dropped"]
pub struct RowClaim<'a> {
    registrar: &'a Registrar,
    id: BetId,
}

impl fmt::Debug for RowClaim<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowClaim").field("id", &self.id).finish()
    }
}

impl Drop for RowClaim<'_> {
    fn drop(&mut self) {
        self.registrar.lock().remove(&self.id);
    }
}

impl Registrar {
    pub fn new(service: Arc<dyn BettingService>) -> Self {
        Self {
            service,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Post a stake for one bet.
    ///
    /// The row is released before returning on failure or cancellation.
    /// On success it stays marked until the returned claim is dropped.
    pub async fn register(
        &self,
        bet_id: &BetId,
        stake: f64,
    ) -> Result<RowClaim<'_>, RegistrationError> {
        if !self.lock().insert(bet_id.clone()) {
            warn!(bet_id = %bet_id, "Duplicate registration refused");
            return Err(RegistrationError::InFlight(bet_id.to_string()));
        }
        let claim = RowClaim {
            registrar: self,
            id: bet_id.clone(),
        };

        let registration = Registration {
            bet_id: bet_id.clone(),
            stake,
        };
        match self.service.register(&registration).await {
            Ok(()) => {
                info!(bet_id = %bet_id, stake = format!("{stake:.2}"), "Stake registered");
                Ok(claim)
            }
            Err(e) => {
                warn!(bet_id = %bet_id, error = %e, "Registration failed");
                Err(RegistrationError::from(e))
            }
        }
    }

    pub fn is_in_flight(&self, bet_id: &BetId) -> bool {
        self.lock().contains(bet_id)
    }

    /// Snapshot of ids currently being registered.
    pub fn in_flight(&self) -> HashSet<BetId> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<BetId>> {
        // The set stays consistent even if a holder panicked.
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
