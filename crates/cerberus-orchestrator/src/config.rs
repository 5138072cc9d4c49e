//! Configuration for the pipeline orchestrator
//!
//! One TOML file carries every stage's settings:
//!
//! ```toml
//! [pipeline]
//! root = "/var/lib/cerberus"
//! capture_interval_ms = 2000
//! clipboard_command = ["wl-paste", "--no-newline"]
//!
//! [classifier]
//! min_content_chars = 2
//!
//! [adjudication]
//! truth_covenant_accept = 2
//!
//! [janitor]
//! sweep_interval_ms = 3000
//! ```

use crate::OrchestratorError;
use cerberus_classifier::ClassifierConfig;
use cerberus_gatekeeper::AdjudicationConfig;
use cerberus_janitor::JanitorConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Stage cadences, collectors and health thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root directory of the artifact store
    /// Default: ./cerberus-data
    pub root: PathBuf,

    /// Capture cadence (in milliseconds)
    /// Default: 2000
    pub capture_interval_ms: u64,

    /// Classify cadence (in milliseconds)
    /// Default: 1000
    pub classify_interval_ms: u64,

    /// Route cadence (in milliseconds)
    /// Default: 500
    pub route_interval_ms: u64,

    /// Adjudicate cadence (in milliseconds)
    /// Default: 700
    pub adjudicate_interval_ms: u64,

    /// Health report cadence (in milliseconds)
    /// Default: 10000
    pub health_interval_ms: u64,

    /// Command printing the current clipboard text; empty disables the probe
    /// Default: []
    pub clipboard_command: Vec<String>,

    /// Timeout for one probe run (in milliseconds)
    /// Default: 2000
    pub probe_timeout_ms: u64,

    /// Extra directory polled for dropped files
    /// Default: none
    pub drop_dir: Option<PathBuf>,

    /// Move artifacts whose final ruling names another placement
    ///
    /// Off by default: the ruling is copied into the verdict ledger and the
    /// pipeline record stays where the router put it.
    /// Default: false
    pub enforce_verdicts: bool,

    /// Inbox artifacts older than this are reported as stuck (in seconds)
    /// Default: 600
    pub stuck_inbox_secs: u64,

    /// Classifying artifacts older than this are reported as stuck (in seconds)
    /// Default: 300
    pub stuck_classifying_secs: u64,

    /// How many recent stage failures the status report keeps
    /// Default: 20
    pub recent_errors: usize,

    /// Whether stages do work as soon as the workers start
    /// Default: true
    pub start_running: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("cerberus-data"),
            capture_interval_ms: 2_000,
            classify_interval_ms: 1_000,
            route_interval_ms: 500,
            adjudicate_interval_ms: 700,
            health_interval_ms: 10_000,
            clipboard_command: Vec::new(),
            probe_timeout_ms: 2_000,
            drop_dir: None,
            enforce_verdicts: false,
            stuck_inbox_secs: 600,
            stuck_classifying_secs: 300,
            recent_errors: 20,
            start_running: true,
        }
    }
}

impl PipelineConfig {
    /// Configuration rooted at `root` with every other field defaulted
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        let cadences = [
            ("capture_interval_ms", self.capture_interval_ms),
            ("classify_interval_ms", self.classify_interval_ms),
            ("route_interval_ms", self.route_interval_ms),
            ("adjudicate_interval_ms", self.adjudicate_interval_ms),
            ("health_interval_ms", self.health_interval_ms),
            ("probe_timeout_ms", self.probe_timeout_ms),
        ];
        for (name, value) in cadences {
            if value == 0 {
                return Err(OrchestratorError::Config(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }
        if self.root.as_os_str().is_empty() {
            return Err(OrchestratorError::Config("root must not be empty".to_string()));
        }
        Ok(())
    }

    /// Timeout for one probe run
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// Full configuration for an [`Orchestrator`](crate::Orchestrator)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Stage cadences and collectors
    pub pipeline: PipelineConfig,

    /// Scorer thresholds and noise filter
    pub classifier: ClassifierConfig,

    /// Final adjudication keyword lists
    pub adjudication: AdjudicationConfig,

    /// Healing, archiving and retention
    pub janitor: JanitorConfig,
}

impl OrchestratorConfig {
    /// Default configuration rooted at `root`
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            pipeline: PipelineConfig::at(root),
            ..Self::default()
        }
    }

    /// Strict preset: sensitive scoring, strict adjudication, no healing
    pub fn strict(root: impl Into<PathBuf>) -> Self {
        Self {
            pipeline: PipelineConfig::at(root),
            classifier: ClassifierConfig::sensitive(),
            adjudication: AdjudicationConfig::strict(),
            janitor: JanitorConfig::lenient(),
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        self.pipeline.validate()?;
        self.classifier.validate()?;
        self.janitor.validate()?;
        Ok(())
    }
}
