use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, UptimeError};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Tunables of the engine. Every field has a default; a missing settings
/// file means "all defaults".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// How many days into the future a query looks before giving up.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// A halt followed by a boot closer than this is treated as noise.
    #[serde(default = "default_min_gap")]
    pub min_gap_minutes: i64,
    /// Subtracted from a boot time so the machine wakes early.
    #[serde(default = "default_grace_boot")]
    pub grace_boot_minutes: i64,
    /// Added to a halt time so the machine stays up slightly longer.
    #[serde(default = "default_grace_halt")]
    pub grace_halt_minutes: i64,
}

fn default_horizon_days() -> u32 {
    7
}

fn default_min_gap() -> i64 {
    10
}

fn default_grace_boot() -> i64 {
    3
}

fn default_grace_halt() -> i64 {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            min_gap_minutes: default_min_gap(),
            grace_boot_minutes: default_grace_boot(),
            grace_halt_minutes: default_grace_halt(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&data).map_err(|e| UptimeError::Settings {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn min_gap(&self) -> Duration {
        Duration::minutes(self.min_gap_minutes)
    }

    pub fn grace_boot(&self) -> Duration {
        Duration::minutes(self.grace_boot_minutes)
    }

    pub fn grace_halt(&self) -> Duration {
        Duration::minutes(self.grace_halt_minutes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
