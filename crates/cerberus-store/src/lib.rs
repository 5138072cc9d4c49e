//! Cerberus Storage Layer
//!
//! Implements the `ArtifactStore` trait on a plain directory tree.
//!
//! # Architecture
//!
//! - One directory per location, one sub-directory per artifact
//! - Records are built in `.tmp/` and renamed into the Inbox
//! - Relocation is a single directory rename, never copy-then-delete
//! - A plain-text, append-only audit log under `logs/`
//! - [`LeaseTable`] for in-process per-artifact exclusion
//!
//! # Examples
//!
//! ```no_run
//! use cerberus_domain::{Artifact, PipelineLocation, SourceKind};
//! use cerberus_domain::traits::ArtifactStore;
//! use cerberus_store::FsStore;
//!
//! let store = FsStore::open("/tmp/cerberus").unwrap();
//! let id = store.deposit(&Artifact::captured_now("hello", SourceKind::Manual)).unwrap();
//! store.relocate(id, PipelineLocation::Inbox, PipelineLocation::Classifying, "claimed").unwrap();
//! ```

#![warn(missing_docs)]

mod fs_store;
mod layout;
mod lease;
pub mod loose;

pub use fs_store::{AdoptReport, FsStore};
pub use layout::StoreLayout;
pub use lease::{LeaseGuard, LeaseTable};
pub use loose::LooseFile;

use cerberus_domain::PipelineLocation;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Artifact not found at the expected location
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// A record with this id already exists at the destination
    #[error("Artifact already exists: {0}")]
    AlreadyExists(String),

    /// The move is not allowed by the pipeline state machine
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        /// Current location
        from: PipelineLocation,
        /// Requested location
        to: PipelineLocation,
    },

    /// Invalid data on disk
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
