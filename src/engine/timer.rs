//! Auto-refresh timer.
//!
//! Owns at most one recurring task. Reconfiguring cancels the running task
//! and waits for it to wind down before anything new is spawned.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::refresh::RefreshCycle;
use crate::types::LocalPreferences;

pub struct AutoRefresh {
    cycle: Arc<RefreshCycle>,
    task: Option<JoinHandle<()>>,
    live: Arc<AtomicUsize>,
}

/// Decrements the live-task count however the task ends.
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn enter(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(live))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl AutoRefresh {
    pub fn new(cycle: Arc<RefreshCycle>) -> Self {
        Self {
            cycle,
            task: None,
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Apply the auto-refresh preferences: stop the current timer, then
    /// start a new one if enabled.
    pub async fn configure(&mut self, prefs: &LocalPreferences) {
        self.stop().await;

        if !prefs.auto_refresh_enabled {
            info!("Auto-refresh disabled");
            return;
        }

        let period = Duration::from_secs(prefs.effective_secs());
        let cycle = Arc::clone(&self.cycle);
        let first = Instant::now() + period;
        let guard = LiveGuard::enter(&self.live);

        self.task = Some(tokio::spawn(async move {
            let _guard = guard;
            let mut ticker = interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match cycle.refresh_if_idle().await {
                    Ok(Some(model)) => debug!(rows = model.rows.len(), "Auto-refresh tick"),
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "Auto-refresh failed, will retry next tick"),
                }
            }
        }));

        info!(interval_secs = period.as_secs(), "Auto-refresh enabled");
    }

    /// Cancel the running timer, if any, and wait until it is gone.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            // Cancelled is the expected outcome here.
            let _ = task.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Number of timer tasks currently alive.
    pub fn live_tasks(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
