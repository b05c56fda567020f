//! Refresh cycle.
//!
//! One cycle fetches the remote settings, then the bet feed, sizes every
//! bet and publishes a fresh [`RenderModel`]. Cycles never overlap: a gate
//! serializes them, so completion order always equals start order.
//! Manual triggers queue behind an in-flight cycle, timer ticks are
//! dropped instead.
//!
//! Every publish bumps a generation counter, whoever triggered the cycle.

use chrono::Local;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::error::RemoteError;
use crate::remote::BettingService;
use crate::types::{BetFilter, RenderModel};

pub struct RefreshCycle {
    service: Arc<dyn BettingService>,
    filter: RwLock<BetFilter>,
    gate: Mutex<()>,
    latest: RwLock<Option<Arc<RenderModel>>>,
    generation: AtomicU64,
}

impl RefreshCycle {
    pub fn new(service: Arc<dyn BettingService>, filter: BetFilter) -> Self {
        Self {
            service,
            filter: RwLock::new(filter),
            gate: Mutex::new(()),
            latest: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Filter sent with the next `GET /bets`.
    pub async fn filter(&self) -> BetFilter {
        self.filter.read().await.clone()
    }

    /// Replace the filter. Takes effect from the next cycle.
    pub async fn set_filter(&self, filter: BetFilter) {
        *self.filter.write().await = filter;
    }

    /// Number of models published so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Run a cycle, waiting for any in-flight one to finish first.
    pub async fn refresh(&self) -> Result<Arc<RenderModel>, RemoteError> {
        let _gate = self.gate.lock().await;
        self.run().await
    }

    /// Run a cycle unless one is already in flight, in which case the
    /// trigger is dropped and `Ok(None)` returned.
    pub async fn refresh_if_idle(&self) -> Result<Option<Arc<RenderModel>>, RemoteError> {
        let Ok(_gate) = self.gate.try_lock() else {
            debug!("Refresh already in flight, skipping trigger");
            return Ok(None);
        };
        self.run().await.map(Some)
    }

    /// The most recently published model, if any cycle has succeeded.
    pub async fn latest(&self) -> Option<Arc<RenderModel>> {
        self.latest.read().await.clone()
    }

    /// Caller must hold the gate.
    async fn run(&self) -> Result<Arc<RenderModel>, RemoteError> {
        debug!("Starting refresh cycle");

        let settings = self.service.fetch_settings().await?;
        let filter = self.filter().await;
        let bets = self.service.fetch_bets(&filter).await?;

        let model = Arc::new(RenderModel::build(settings, bets, Local::now()));
        *self.latest.write().await = Some(Arc::clone(&model));
        self.generation.fetch_add(1, Ordering::SeqCst);

        info!(
            rows = model.rows.len(),
            kelly_pct = format!("{:.1}%", model.settings.kelly_pct()),
            "Refresh complete"
        );
        Ok(model)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
