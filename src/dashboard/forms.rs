//! Form input parsing.
//!
//! Browser forms arrive as strings. Each field is parsed into a typed value
//! or a [`ValidationError`]. Only the auto-refresh interval and the row
//! stake are lenient: blank or unreadable input falls back to a default.
//! Blank filter fields mean "no filter".

use serde::Deserialize;

use crate::error::ValidationError;
use crate::types::{BetFilter, LocalPreferences, RemoteSettings, DEFAULT_REFRESH_SECS};

/// `POST /settings` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub kelly_pct: String,
    #[serde(default)]
    pub stake_min: String,
    #[serde(default)]
    pub stake_max: String,
    #[serde(default)]
    pub page_limit: String,
    /// Checkbox: present when ticked, absent otherwise.
    #[serde(default)]
    pub auto_refresh: Option<String>,
    #[serde(default)]
    pub auto_refresh_secs: String,
}

impl SettingsForm {
    /// Split into the remote-owned and the local-only halves.
    pub fn parse(&self) -> Result<(RemoteSettings, LocalPreferences), ValidationError> {
        let kelly_pct = parse_finite(&self.kelly_pct)
            .filter(|pct| *pct > 0.0 && *pct <= 100.0)
            .ok_or_else(|| ValidationError::KellyPct(self.kelly_pct.clone()))?;

        let stake_min = parse_finite(&self.stake_min)
            .filter(|min| *min >= 0.0)
            .ok_or_else(|| ValidationError::StakeMin(self.stake_min.clone()))?;

        let stake_max = parse_finite(&self.stake_max)
            .filter(|max| *max >= stake_min)
            .ok_or_else(|| ValidationError::StakeMax(self.stake_max.clone()))?;

        let page_limit = self
            .page_limit
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ValidationError::PageLimit(self.page_limit.clone()))?;

        let remote = RemoteSettings {
            kelly_fraction: kelly_pct / 100.0,
            stake_min,
            stake_max,
            page_limit,
        };

        let local = LocalPreferences {
            auto_refresh_enabled: self.auto_refresh.is_some(),
            auto_refresh_secs: self
                .auto_refresh_secs
                .trim()
                .parse::<u64>()
                .unwrap_or(DEFAULT_REFRESH_SECS),
        };

        Ok((remote, local))
    }
}

/// `POST /register/:bet_id` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StakeForm {
    #[serde(default)]
    pub stake: String,
}

impl StakeForm {
    /// Blank or unreadable means zero. Negative or non-finite is refused.
    pub fn parse(&self) -> Result<f64, ValidationError> {
        let raw = self.stake.trim();
        match raw.parse::<f64>() {
            Err(_) => Ok(0.0),
            Ok(stake) if stake.is_finite() && stake >= 0.0 => Ok(stake),
            Ok(_) => Err(ValidationError::Stake(self.stake.clone())),
        }
    }
}

/// `POST /filters` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub sport: String,
    #[serde(default)]
    pub bookmaker: String,
    #[serde(default)]
    pub hours_before: String,
    #[serde(default)]
    pub edge_min: String,
    #[serde(default)]
    pub edge_max: String,
}

impl FilterForm {
    pub fn parse(&self) -> Result<BetFilter, ValidationError> {
        let hours_before = optional(&self.hours_before, |raw| raw.parse::<u32>().ok())
            .map_err(|_| ValidationError::HoursBefore(self.hours_before.clone()))?;
        let edge_min = optional(&self.edge_min, parse_finite)
            .map_err(|_| ValidationError::EdgeMin(self.edge_min.clone()))?;
        let edge_max = optional(&self.edge_max, parse_finite)
            .ok()
            .filter(|max| match (edge_min, *max) {
                (Some(min), Some(max)) => max >= min,
                _ => true,
            })
            .ok_or_else(|| ValidationError::EdgeMax(self.edge_max.clone()))?;

        Ok(BetFilter {
            sport: text(&self.sport),
            bookmaker: text(&self.bookmaker),
            hours_before,
            edge_min,
            edge_max,
        })
    }
}

fn text(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

/// Blank is `Ok(None)`; anything else must parse.
fn optional<T>(raw: &str, parse: impl Fn(&str) -> Option<T>) -> Result<Option<T>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    parse(raw).map(Some).ok_or(())
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
