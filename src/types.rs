//! Shared types for the stakeboard client.
//!
//! Wire shapes mirror the remote betting API's JSON (snake_case). The
//! render model is the only value handed to the dashboard renderer.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::strategy::kelly::suggest_stake;

// ---------------------------------------------------------------------------
// Remote settings
// ---------------------------------------------------------------------------

/// Sizing settings owned by the remote service.
///
/// Fetched at the start of every refresh cycle and never persisted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Fraction of full Kelly to stake, in (0, 1].
    pub kelly_fraction: f64,
    pub stake_min: f64,
    pub stake_max: f64,
    /// Maximum number of bets the service returns per page.
    pub page_limit: u32,
}

impl RemoteSettings {
    /// Suggested stake for a single bet under these settings.
    pub fn suggest_for(&self, bet: &Bet) -> f64 {
        suggest_stake(
            self.kelly_fraction,
            bet.odds,
            bet.edge,
            self.stake_min,
            self.stake_max,
        )
    }

    /// Kelly fraction as the percentage shown in the settings panel.
    pub fn kelly_pct(&self) -> f64 {
        self.kelly_fraction * 100.0
    }
}

// ---------------------------------------------------------------------------
// Local preferences
// ---------------------------------------------------------------------------

/// Auto-refresh interval used when nothing has been stored yet.
pub const DEFAULT_REFRESH_SECS: u64 = 10;

/// The timer never ticks faster than this, whatever is stored.
pub const MIN_REFRESH_SECS: u64 = 5;

/// Client-only preferences. Never sent to the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPreferences {
    pub auto_refresh_enabled: bool,
    pub auto_refresh_secs: u64,
}

impl Default for LocalPreferences {
    fn default() -> Self {
        Self {
            auto_refresh_enabled: false,
            auto_refresh_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

impl LocalPreferences {
    /// Interval the timer actually uses, floored at [`MIN_REFRESH_SECS`].
    pub fn effective_secs(&self) -> u64 {
        self.auto_refresh_secs.max(MIN_REFRESH_SECS)
    }
}

// ---------------------------------------------------------------------------
// Bets
// ---------------------------------------------------------------------------

/// Opaque bet identifier. The API may send either a string or an integer,
/// and registration must echo back exactly what was received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BetId {
    Num(i64),
    Text(String),
}

impl BetId {
    /// Path segment naming the JSON type, so `1` and `"1"` stay distinct
    /// in dashboard URLs.
    pub fn kind(&self) -> &'static str {
        match self {
            BetId::Num(_) => "num",
            BetId::Text(_) => "text",
        }
    }

    /// Rebuild an id from its `kind` and raw value.
    pub fn from_parts(kind: &str, raw: &str) -> Option<Self> {
        match kind {
            "num" => raw.parse().ok().map(BetId::Num),
            "text" => Some(BetId::Text(raw.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetId::Num(n) => write!(f, "{n}"),
            BetId::Text(s) => f.write_str(s),
        }
    }
}

/// A betting opportunity as listed by the remote feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: BetId,
    pub event: String,
    pub bookmaker: String,
    pub market: String,
    pub selection: String,
    /// Decimal odds, stake included.
    pub odds: f64,
    /// Estimated edge as a fraction (0.05 = 5%).
    pub edge: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    /// ISO-8601 start time, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} / {} / {} @ {:.2} (edge {:.1}%)",
            self.bookmaker,
            self.event,
            self.market,
            self.selection,
            self.odds,
            self.edge * 100.0,
        )
    }
}

/// Server-side filters applied to `GET /bets`.
///
/// Edge bounds are percentages, which is what the feed expects.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BetFilter {
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub bookmaker: Option<String>,
    #[serde(default)]
    pub hours_before: Option<u32>,
    #[serde(default)]
    pub edge_min: Option<f64>,
    #[serde(default)]
    pub edge_max: Option<f64>,
}

impl BetFilter {
    /// Encoded query string, empty when no filter is set.
    pub fn to_query(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();
        if let Some(sport) = &self.sport {
            pairs.push(format!("sport={}", urlencoding::encode(sport)));
        }
        if let Some(bookmaker) = &self.bookmaker {
            pairs.push(format!("bookmaker={}", urlencoding::encode(bookmaker)));
        }
        if let Some(hours) = self.hours_before {
            pairs.push(format!("hours_before={hours}"));
        }
        if let Some(min) = self.edge_min {
            pairs.push(format!("edge_min={min}"));
        }
        if let Some(max) = self.edge_max {
            pairs.push(format!("edge_max={max}"));
        }
        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

/// Values the feed currently offers for the sport and bookmaker filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterChoices {
    pub sports: Vec<String>,
    pub bookmakers: Vec<String>,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub bet_id: BetId,
    pub stake: f64,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub time: Option<String>,
}

// ---------------------------------------------------------------------------
// Render model
// ---------------------------------------------------------------------------

/// One table row: the bet as received plus its suggested stake.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakeRow {
    pub bet: Bet,
    pub suggested_stake: f64,
}

/// Everything one refresh cycle produced. Replaced wholesale by the next
/// cycle and never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderModel {
    pub settings: RemoteSettings,
    pub rows: Vec<StakeRow>,
    pub updated_at: DateTime<Local>,
}

impl RenderModel {
    /// Size every bet and keep the feed's ordering.
    pub fn build(settings: RemoteSettings, bets: Vec<Bet>, updated_at: DateTime<Local>) -> Self {
        let rows = bets
            .into_iter()
            .map(|bet| StakeRow {
                suggested_stake: settings.suggest_for(&bet),
                bet,
            })
            .collect();
        Self {
            settings,
            rows,
            updated_at,
        }
    }

    /// Look up a listed bet by id.
    pub fn find(&self, id: &BetId) -> Option<&StakeRow> {
        self.rows.iter().find(|row| &row.bet.id == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
