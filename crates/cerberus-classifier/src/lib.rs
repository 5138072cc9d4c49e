//! Cerberus Classifier
//!
//! Assigns every captured artifact a trust category and a destination.
//!
//! The classifier provides:
//! - [`Scorer`]: pattern-family scoring with a hard hostility override
//! - [`ClassificationEngine`]: noise filtering and per-artifact logging
//! - [`StageRouter`]: the category to location table
//!
//! # Examples
//!
//! ```
//! use cerberus_classifier::{Scorer, StageRouter};
//! use cerberus_domain::{Category, PipelineLocation};
//!
//! let result = Scorer::new()
//!     .score("source: confirmed, the data shows a verified result")
//!     .unwrap();
//! assert_eq!(result.category, Category::Fact);
//! assert_eq!(StageRouter::default().route_result(&result), PipelineLocation::Accepted);
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
pub mod patterns;
mod router;
mod scorer;

pub use config::{ClassifierConfig, ScoringThresholds, ScoringWeights};
pub use engine::{ClassificationEngine, ClassificationOutcome, DiscardReason};
pub use error::ClassifierError;
pub use router::StageRouter;
pub use scorer::Scorer;
