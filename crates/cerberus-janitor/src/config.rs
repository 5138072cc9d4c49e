//! Configuration for Janitor operations
//!
//! Defines the sweep cadence, the healing policy, and the archive and
//! retention windows.

use crate::JanitorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which built-in healing policy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealingPolicyKind {
    /// Promote every adjudicated quarantined artifact
    Always,
    /// Never promote; quarantine is held until purged or handled by hand
    Never,
}

/// Configuration for the Janitor service
///
/// # Examples
///
/// ```
/// use cerberus_janitor::JanitorConfig;
///
/// // Default configuration (balanced)
/// let config = JanitorConfig::default();
/// assert_eq!(config.sweep_interval_ms, 3_000);
///
/// // Aggressive cleanup
/// let config = JanitorConfig::aggressive();
/// assert_eq!(config.archive_retention_days, 30);
///
/// // Lenient cleanup
/// let config = JanitorConfig::lenient();
/// assert_eq!(config.archive_retention_days, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    /// How often to run the sweep cycle (in milliseconds)
    /// Default: 3000
    pub sweep_interval_ms: u64,

    /// Enable the quarantine healing pass
    /// Default: true
    pub heal: bool,

    /// Policy used by the healing pass
    /// Default: always
    pub healing_policy: HealingPolicyKind,

    /// Accepted artifacts whose final ruling was ACCEPT are archived once they
    /// have sat in Accepted this long (in seconds)
    /// Default: 3600
    pub archive_after_secs: u64,

    /// Archived artifacts older than this are deleted (in days, 0 = keep forever)
    /// Default: 0
    pub archive_retention_days: u64,

    /// Quarantined artifacts older than this are deleted (in days, 0 = keep forever)
    /// Default: 0
    pub quarantine_retention_days: u64,

    /// Dry-run mode: log what would move or be deleted without touching the store
    /// Default: false
    pub dry_run: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval_ms: 3_000,
            heal: true,
            healing_policy: HealingPolicyKind::Always,
            archive_after_secs: 3_600,
            archive_retention_days: 0,
            quarantine_retention_days: 0,
            dry_run: false,
        }
    }
}

impl JanitorConfig {
    /// Aggressive cleanup configuration (archive early, bounded retention)
    pub fn aggressive() -> Self {
        Self {
            sweep_interval_ms: 1_000,
            archive_after_secs: 300,
            archive_retention_days: 30,
            quarantine_retention_days: 7,
            ..Self::default()
        }
    }

    /// Lenient configuration (no healing, nothing is ever deleted)
    pub fn lenient() -> Self {
        Self {
            sweep_interval_ms: 5_000,
            heal: false,
            healing_policy: HealingPolicyKind::Never,
            archive_after_secs: 86_400,
            ..Self::default()
        }
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<(), JanitorError> {
        if self.sweep_interval_ms == 0 {
            return Err(JanitorError::Config(
                "sweep_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    /// Age at which an accepted artifact is archived
    pub fn archive_after(&self) -> Duration {
        Duration::from_secs(self.archive_after_secs)
    }

    /// Retention window for Archived, if compaction is enabled
    pub fn archive_retention(&self) -> Option<Duration> {
        days(self.archive_retention_days)
    }

    /// Retention window for Quarantine, if purging is enabled
    pub fn quarantine_retention(&self) -> Option<Duration> {
        days(self.quarantine_retention_days)
    }
}

fn days(n: u64) -> Option<Duration> {
    (n > 0).then(|| Duration::from_secs(n * 86_400))
}
