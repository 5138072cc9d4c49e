//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The daemon could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// The daemon answered with an error
    #[error("API error: {0}")]
    Api(String),

    /// Pipeline error
    #[error(transparent)]
    Orchestrator(#[from] cerberus_orchestrator::OrchestratorError),

    /// HTTP server error
    #[error(transparent)]
    Server(#[from] cerberus_api::ApiError),

    /// Classifier error
    #[error(transparent)]
    Classifier(#[from] cerberus_classifier::ClassifierError),

    /// Adjudicator error
    #[error(transparent)]
    Gatekeeper(#[from] cerberus_gatekeeper::GatekeeperError),

    /// Store error
    #[error(transparent)]
    Store(#[from] cerberus_store::StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
