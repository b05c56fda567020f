//! Local preference persistence.
//!
//! The two auto-refresh preferences live in a small JSON file of string
//! keys to string values, so they survive restarts. The flag is stored as
//! `"1"`/`"0"` and the interval as a decimal integer string. Other keys in
//! the file are left untouched. Unreadable data never stops the client: it
//! falls back to the defaults and is overwritten on the next save.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::types::LocalPreferences;

/// Default preferences file path.
pub const DEFAULT_PREFS_FILE: &str = "stakeboard_prefs.json";

const KEY_AUTO_REFRESH: &str = "stakeboard.auto_refresh";
const KEY_AUTO_REFRESH_SECS: &str = "stakeboard.auto_refresh_secs";

/// Durable key-value store for [`LocalPreferences`].
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load preferences. A missing or unreadable file, a missing key, or an
    /// undecodable value all fall back to the default.
    pub fn load(&self) -> LocalPreferences {
        let entries = self.read_entries_or_empty();
        let defaults = LocalPreferences::default();

        let auto_refresh_enabled = match entries.get(KEY_AUTO_REFRESH).map(String::as_str) {
            None => defaults.auto_refresh_enabled,
            Some("1") => true,
            Some("0") => false,
            Some(other) => {
                warn!(key = KEY_AUTO_REFRESH, value = other, "Unreadable preference, using default");
                defaults.auto_refresh_enabled
            }
        };

        let auto_refresh_secs = match entries.get(KEY_AUTO_REFRESH_SECS) {
            None => defaults.auto_refresh_secs,
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!(key = KEY_AUTO_REFRESH_SECS, value = %raw, "Unreadable preference, using default");
                defaults.auto_refresh_secs
            }),
        };

        let prefs = LocalPreferences {
            auto_refresh_enabled,
            auto_refresh_secs,
        };
        debug!(path = %self.path.display(), ?prefs, "Preferences loaded");
        prefs
    }

    /// Persist both preferences.
    pub fn save(&self, prefs: &LocalPreferences) -> Result<()> {
        let mut entries = self.read_entries_or_empty();
        entries.insert(
            KEY_AUTO_REFRESH.to_string(),
            if prefs.auto_refresh_enabled { "1" } else { "0" }.to_string(),
        );
        entries.insert(
            KEY_AUTO_REFRESH_SECS.to_string(),
            prefs.auto_refresh_secs.to_string(),
        );

        let json = serde_json::to_string_pretty(&entries)
            .context("Failed to serialise preferences")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences to {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            enabled = prefs.auto_refresh_enabled,
            secs = prefs.auto_refresh_secs,
            "Preferences saved"
        );
        Ok(())
    }

    fn read_entries_or_empty(&self) -> BTreeMap<String, String> {
        self.read_entries().unwrap_or_else(|e| {
            warn!(error = format!("{e:#}"), "Ignoring unreadable preferences file");
            BTreeMap::new()
        })
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences from {}", self.path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse preferences from {}", self.path.display()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
