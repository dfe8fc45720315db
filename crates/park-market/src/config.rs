//! Matcher configuration.

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

/// Default look-ahead used when an owner asks for pending requests.
pub const DEFAULT_OWNER_HORIZON_HOURS: i64 = 7 * 24;

/// Default snapshot file stem for file-backed stores.
pub const DEFAULT_SNAPSHOT_NAME: &str = "parking";

/// Configuration for a [`crate::Matcher`] and its stores.
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// How far ahead, in hours from the current hour, owner request
    /// queries look by default.
    pub owner_horizon_hours: i64,
    /// File stem of the JSON snapshot.
    pub snapshot_name: String,
    /// Directory holding the JSON snapshot. `None` means in-memory only.
    pub state_dir: Option<PathBuf>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            owner_horizon_hours: DEFAULT_OWNER_HORIZON_HOURS,
            snapshot_name: DEFAULT_SNAPSHOT_NAME.to_string(),
            state_dir: None,
        }
    }
}

impl MatcherConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the owner look-ahead in hours.
    #[must_use]
    pub const fn with_owner_horizon_hours(mut self, hours: i64) -> Self {
        self.owner_horizon_hours = hours;
        self
    }

    /// Sets the snapshot file stem.
    #[must_use]
    pub fn with_snapshot_name(mut self, name: impl Into<String>) -> Self {
        self.snapshot_name = name.into();
        self
    }

    /// Sets the snapshot directory.
    #[must_use]
    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = Some(dir.into());
        self
    }

    /// Owner look-ahead as a duration.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if the horizon does not fit a
    /// [`TimeDelta`].
    pub fn owner_horizon(&self) -> Result<TimeDelta> {
        TimeDelta::try_hours(self.owner_horizon_hours).ok_or_else(|| MarketError::Config {
            reason: format!(
                "owner_horizon_hours {} is out of range",
                self.owner_horizon_hours
            ),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if the horizon is not positive or out
    /// of range, or the snapshot name is empty or contains a path separator.
    pub fn validate(&self) -> Result<()> {
        if self.owner_horizon_hours <= 0 {
            return Err(MarketError::Config {
                reason: format!(
                    "owner_horizon_hours must be positive, got {}",
                    self.owner_horizon_hours
                ),
            });
        }
        self.owner_horizon()?;
        if self.snapshot_name.trim().is_empty() {
            return Err(MarketError::Config {
                reason: "snapshot_name must not be empty".into(),
            });
        }
        if self.snapshot_name.contains(['/', '\\']) {
            return Err(MarketError::Config {
                reason: format!("snapshot_name '{}' contains a path separator", self.snapshot_name),
            });
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] on malformed JSON or invalid values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| MarketError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if the file cannot be read or is
    /// invalid.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| MarketError::Config {
            reason: format!("{}: {e}", path.display()),
        })?;
        Self::from_json_str(&json)
    }
}
