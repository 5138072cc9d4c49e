//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline rules and
//! infrastructure. The filesystem implementation lives in `cerberus-store`.

use crate::{Artifact, ArtifactId, ArtifactMetadata, Decision, PipelineLocation, StoredArtifact};
use std::fmt;

/// Trait for the durable artifact store
///
/// Implemented by the infrastructure layer (cerberus-store). Methods take `&self`:
/// the store itself is the only medium stages share, and every mutation that
/// changes an artifact's location must be a single atomic relocation.
pub trait ArtifactStore {
    /// Error type for store operations
    type Error;

    /// Deposit a freshly captured artifact into the Inbox
    fn deposit(&self, artifact: &Artifact) -> Result<ArtifactId, Self::Error>;

    /// Load an artifact from a specific location
    ///
    /// Returns `Ok(None)` when the artifact is not (or no longer) at `location`.
    fn load(
        &self,
        id: ArtifactId,
        location: PipelineLocation,
    ) -> Result<Option<StoredArtifact>, Self::Error>;

    /// List artifact ids currently at a location, oldest first
    fn list(&self, location: PipelineLocation) -> Result<Vec<ArtifactId>, Self::Error>;

    /// Count artifacts at a location
    fn count(&self, location: PipelineLocation) -> Result<usize, Self::Error> {
        self.list(location).map(|ids| ids.len())
    }

    /// Overwrite the metadata record of an artifact in place
    fn save_metadata(
        &self,
        metadata: &ArtifactMetadata,
        location: PipelineLocation,
    ) -> Result<(), Self::Error>;

    /// Atomically move an artifact between locations, recording the transition
    fn relocate(
        &self,
        id: ArtifactId,
        from: PipelineLocation,
        to: PipelineLocation,
        reason: &str,
    ) -> Result<(), Self::Error>;

    /// Move an artifact between placements to enforce a ruling
    ///
    /// Checked against [`PipelineLocation::can_reassign_to`] rather than the
    /// transition table, which never allows placement-to-placement moves.
    fn reassign(
        &self,
        id: ArtifactId,
        from: PipelineLocation,
        to: PipelineLocation,
        reason: &str,
    ) -> Result<(), Self::Error>;

    /// Permanently remove an artifact
    fn delete(&self, id: ArtifactId, location: PipelineLocation) -> Result<(), Self::Error>;

    /// Copy an artifact into the verdict ledger for `decision`
    ///
    /// Content is copied from the record at `location` and `metadata` is
    /// written beside it. The pipeline record stays where it is; the ledger is
    /// not a pipeline location. Copying again overwrites the earlier copy.
    fn copy_to_verdicts(
        &self,
        metadata: &ArtifactMetadata,
        location: PipelineLocation,
        decision: Decision,
    ) -> Result<(), Self::Error>;

    /// Append one line to the audit log
    fn append_audit(&self, entry: &AuditEntry) -> Result<(), Self::Error>;
}

/// Severity of an audit log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    /// Routine transition
    Info,
    /// Content rejected or held
    Warning,
    /// Safety-relevant event (hostility, danger)
    Alert,
}

impl AuditLevel {
    /// Get the level name as written to the audit log
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditLevel::Info => "INFO",
            AuditLevel::Warning => "WARNING",
            AuditLevel::Alert => "ALERT",
        }
    }
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit log line, before timestamping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// Severity
    pub level: AuditLevel,
    /// Upper-case event name (e.g. "ACCEPTED", "QUARANTINED", "HEALED")
    pub event: String,
    /// Artifact concerned
    pub id: ArtifactId,
    /// Free-form detail (reasons joined with "; ")
    pub detail: String,
}

impl AuditEntry {
    /// Create an audit entry
    pub fn new(
        level: AuditLevel,
        event: impl Into<String>,
        id: ArtifactId,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            level,
            event: event.into(),
            id,
            detail: detail.into(),
        }
    }
}

/// Decides whether a quarantined artifact may be promoted back to Accepted
///
/// Implemented by the janitor's healing policies; this is the seam where
/// stricter promotion logic plugs in without touching the state machine.
pub trait HealingPolicy: Send + Sync {
    /// Whether the artifact may leave quarantine
    fn can_heal(&self, artifact: &Artifact, metadata: &ArtifactMetadata) -> bool;

    /// Short policy name for logs
    fn name(&self) -> &'static str {
        "custom"
    }
}
