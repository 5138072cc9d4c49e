//! Configuration file for the CLI and the daemon it runs.
//!
//! ```toml
//! [pipeline]
//! root = "/home/me/.cerberus/data"
//!
//! [janitor]
//! healing_policy = "never"
//!
//! [api]
//! bind_port = 8420
//!
//! [settings]
//! color = true
//! format = "table"
//! ```

use crate::error::{CliError, Result};
use cerberus_api::config::ApiConfig;
use cerberus_classifier::ClassifierConfig;
use cerberus_gatekeeper::AdjudicationConfig;
use cerberus_janitor::JanitorConfig;
use cerberus_orchestrator::{OrchestratorConfig, PipelineConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Full configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stage cadences, collectors and store root
    pub pipeline: PipelineConfig,

    /// Scorer thresholds and noise filter
    pub classifier: ClassifierConfig,

    /// Final adjudication keyword lists
    pub adjudication: AdjudicationConfig,

    /// Healing, archiving and retention
    pub janitor: JanitorConfig,

    /// HTTP status API
    pub api: ApiConfig,

    /// Output settings
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl From<crate::cli::CliFormat> for OutputFormat {
    fn from(format: crate::cli::CliFormat) -> Self {
        match format {
            crate::cli::CliFormat::Table => OutputFormat::Table,
            crate::cli::CliFormat::Json => OutputFormat::Json,
        }
    }
}

impl Config {
    /// Directory holding the default configuration and data.
    pub fn home() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".cerberus"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home()?.join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used
    /// when present and built-in defaults (data under `~/.cerberus/data`)
    /// otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        let path = Self::path()?;
        if path.exists() {
            return Self::from_file(&path);
        }

        let mut config = Self::default();
        config.pipeline.root = Self::home()?.join("data");
        Ok(config)
    }

    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Pipeline configuration, with the store root optionally overridden.
    pub fn orchestrator(&self, root: Option<PathBuf>) -> OrchestratorConfig {
        let mut pipeline = self.pipeline.clone();
        if let Some(root) = root {
            pipeline.root = root;
        }
        OrchestratorConfig {
            pipeline,
            classifier: self.classifier.clone(),
            adjudication: self.adjudication.clone(),
            janitor: self.janitor.clone(),
        }
    }
}
