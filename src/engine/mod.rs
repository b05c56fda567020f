//! Board: the client's orchestration layer.
//!
//! Owns the refresh cycle, the auto-refresh timer, the registrar and the
//! two configuration sources (remote sizing settings, local preferences),
//! and exposes the user actions the dashboard wires to its routes.

pub mod refresh;
pub mod registrar;
pub mod timer;

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::error::BoardError;
use crate::remote::BettingService;
use crate::storage::PreferenceStore;
use crate::types::{BetFilter, BetId, FilterChoices, LocalPreferences, RemoteSettings, RenderModel};
use refresh::RefreshCycle;
use registrar::Registrar;
use timer::AutoRefresh;

/// A message shown above the table until the next model is published,
/// whether by a user action or by the timer.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Error(String),
    Info(String),
}

/// A notice together with the cycle generation it was raised against.
#[derive(Debug)]
struct Raised {
    generation: u64,
    notice: Notice,
}

/// Everything the renderer needs, captured at one instant.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub model: Option<Arc<RenderModel>>,
    pub prefs: LocalPreferences,
    pub in_flight: HashSet<BetId>,
    pub notice: Option<Notice>,
    pub filter: BetFilter,
    pub choices: FilterChoices,
}

pub struct Board {
    service: Arc<dyn BettingService>,
    cycle: Arc<RefreshCycle>,
    registrar: Registrar,
    store: PreferenceStore,
    prefs: RwLock<LocalPreferences>,
    timer: Mutex<AutoRefresh>,
    notice: RwLock<Option<Raised>>,
    choices: RwLock<FilterChoices>,
}

impl Board {
    /// Build the board and read the stored local preferences.
    pub fn new(service: Arc<dyn BettingService>, store: PreferenceStore, filter: BetFilter) -> Self {
        let prefs = store.load();
        let cycle = Arc::new(RefreshCycle::new(Arc::clone(&service), filter));

        Self {
            registrar: Registrar::new(Arc::clone(&service)),
            timer: Mutex::new(AutoRefresh::new(Arc::clone(&cycle))),
            service,
            cycle,
            store,
            prefs: RwLock::new(prefs),
            notice: RwLock::new(None),
            choices: RwLock::new(FilterChoices::default()),
        }
    }

    /// Initial load, then the filter choices, then arm the timer from the
    /// stored preferences.
    ///
    /// A failed load leaves a single connectivity notice and an empty table.
    pub async fn start(&self) {
        match self.cycle.refresh().await {
            Ok(model) => info!(rows = model.rows.len(), "Initial load complete"),
            Err(e) => {
                let advice = format!(
                    "Could not load data from the betting service at {}. \
                     Check your connection and that the service is running. ({e})",
                    self.service.base_url()
                );
                error!(error = %e, url = %self.service.base_url(), "Initial load failed");
                self.raise(Notice::Error(advice)).await;
            }
        }

        self.reload_choices().await;

        let prefs = *self.prefs.read().await;
        self.timer.lock().await.configure(&prefs).await;
    }

    /// Manual refresh. Queues behind an in-flight cycle.
    pub async fn refresh(&self) -> Result<Arc<RenderModel>, BoardError> {
        Ok(self.cycle.refresh().await?)
    }

    /// Re-read the sport and bookmaker lists. A failure keeps the previous
    /// lists.
    pub async fn reload_choices(&self) {
        let lists = tokio::try_join!(self.service.list_sports(), self.service.list_bookmakers());
        match lists {
            Ok((sports, bookmakers)) => {
                info!(
                    sports = sports.len(),
                    bookmakers = bookmakers.len(),
                    "Filter choices loaded"
                );
                *self.choices.write().await = FilterChoices { sports, bookmakers };
            }
            Err(e) => warn!(error = %e, "Could not load filter choices"),
        }
    }

    /// Replace the bet filter and redraw with it.
    pub async fn apply_filter(&self, filter: BetFilter) -> Result<Arc<RenderModel>, BoardError> {
        info!(
            sport = ?filter.sport,
            bookmaker = ?filter.bookmaker,
            hours_before = ?filter.hours_before,
            edge_min = ?filter.edge_min,
            edge_max = ?filter.edge_max,
            "Bet filter changed"
        );
        self.cycle.set_filter(filter).await;
        self.refresh().await
    }

    /// Save the remote sizing settings, then the local preferences, then
    /// re-arm the timer and redraw. The local half is only touched once the
    /// remote accepted its half.
    pub async fn save_settings(
        &self,
        remote: RemoteSettings,
        local: LocalPreferences,
    ) -> Result<Arc<RenderModel>, BoardError> {
        self.service.save_settings(&remote).await?;
        info!(
            kelly_pct = format!("{:.1}%", remote.kelly_pct()),
            stake_min = remote.stake_min,
            stake_max = remote.stake_max,
            page_limit = remote.page_limit,
            "Remote settings saved"
        );

        self.store.save(&local).map_err(BoardError::Storage)?;
        *self.prefs.write().await = local;
        self.timer.lock().await.configure(&local).await;

        self.refresh().await
    }

    /// Register a stake against a listed bet, then redraw.
    ///
    /// The row stays in flight until the redraw has finished. A failed
    /// redraw after a successful registration does not undo the
    /// registration; it is reported through the notice instead.
    pub async fn register(&self, bet_id: &BetId, stake: f64) -> Result<(), BoardError> {
        let listed = self
            .cycle
            .latest()
            .await
            .is_some_and(|model| model.find(bet_id).is_some());
        if !listed {
            return Err(BoardError::UnknownBet(bet_id.to_string()));
        }

        let claim = self.registrar.register(bet_id, stake).await?;

        let notice = match self.refresh().await {
            Ok(_) => Notice::Info(format!("Registered a stake of {stake:.2} on bet {bet_id}.")),
            Err(e) => {
                warn!(error = %e, "Refresh after registration failed");
                Notice::Error(format!(
                    "Stake registered, but the table could not be refreshed: {e}"
                ))
            }
        };
        self.raise(notice).await;
        drop(claim);
        Ok(())
    }

    /// Show `notice` until the next model is published.
    async fn raise(&self, notice: Notice) {
        *self.notice.write().await = Some(Raised {
            generation: self.cycle.generation(),
            notice,
        });
    }

    /// Snapshot for rendering.
    pub async fn view(&self) -> BoardView {
        let generation = self.cycle.generation();
        let notice = self
            .notice
            .read()
            .await
            .as_ref()
            .filter(|raised| raised.generation == generation)
            .map(|raised| raised.notice.clone());

        BoardView {
            model: self.cycle.latest().await,
            prefs: *self.prefs.read().await,
            in_flight: self.registrar.in_flight(),
            notice,
            filter: self.cycle.filter().await,
            choices: self.choices.read().await.clone(),
        }
    }

    pub async fn prefs(&self) -> LocalPreferences {
        *self.prefs.read().await
    }

    /// Number of live auto-refresh tasks (0 or 1).
    pub async fn timer_tasks(&self) -> usize {
        self.timer.lock().await.live_tasks()
    }

    pub fn base_url(&self) -> &str {
        self.service.base_url()
    }

    /// Stop the timer. In-flight requests are left to finish on their own.
    pub async fn shutdown(&self) {
        self.timer.lock().await.stop().await;
        info!("Board stopped");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
