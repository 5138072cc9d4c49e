//! Cerberus Domain Layer
//!
//! Core records and trait boundaries for the Cerberus trust pipeline. Every other
//! crate depends on this one; it performs no I/O of its own.
//!
//! ## Key Concepts
//!
//! - **Artifact**: one unit of captured text, immutable once captured
//! - **ClassificationResult**: the scorer's verdict and the reasons behind it
//! - **AdjudicationDecision**: the final ruling (accept, quarantine, review)
//! - **PipelineLocation**: the single stage an artifact currently occupies
//! - **ArtifactMetadata**: the sibling record holding classification and history
//!
//! ## Architecture
//!
//! - Pure data and rules only; the filesystem store lives in `cerberus-store`
//! - Trait definitions for the store and the healing policy seam
//! - `serde` is the only dependency beyond `uuid`, so records can be persisted
//!   and served without conversion layers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adjudication;
pub mod artifact;
pub mod classification;
pub mod location;
pub mod metadata;
pub mod traits;

// Re-exports for convenience
pub use adjudication::{AdjudicationDecision, Decision};
pub use artifact::{Artifact, ArtifactId, SourceKind};
pub use classification::{Category, ClassificationResult, Scores};
pub use location::PipelineLocation;
pub use metadata::{ArtifactMetadata, StoredArtifact, Transition};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in seconds since Unix epoch
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
