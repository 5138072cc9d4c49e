//! Error types for the orchestrator

use thiserror::Error;

/// Errors raised while building or driving the pipeline
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Store failure
    #[error("Storage error: {0}")]
    Store(#[from] cerberus_store::StoreError),

    /// Classifier failure
    #[error("Classifier error: {0}")]
    Classifier(#[from] cerberus_classifier::ClassifierError),

    /// Adjudicator failure
    #[error("Adjudicator error: {0}")]
    Gatekeeper(#[from] cerberus_gatekeeper::GatekeeperError),

    /// Janitor failure
    #[error("Janitor error: {0}")]
    Janitor(#[from] cerberus_janitor::JanitorError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A record is not in the shape its location requires
    #[error("Invalid pipeline state: {0}")]
    State(String),

    /// A collector failed to run
    #[error("Capture error: {0}")]
    Capture(String),
}
