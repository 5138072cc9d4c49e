//! Classifier error types

use thiserror::Error;

/// Errors that can occur during classification
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Empty or whitespace-only text is never scored
    #[error("Cannot score empty input")]
    EmptyInput,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
