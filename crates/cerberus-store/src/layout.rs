//! On-disk layout of the pipeline root

use cerberus_domain::{ArtifactId, Decision, PipelineLocation};
use std::path::{Path, PathBuf};

/// Content file inside a record directory
pub const CONTENT_FILE: &str = "content.txt";

/// Metadata file inside a record directory
pub const META_FILE: &str = "meta.json";

/// Path arithmetic for a pipeline root
///
/// ```text
/// <root>/{inbox,classifying,staged,accepted,quarantine,review,archived}/<id>/{content.txt,meta.json}
/// <root>/verdicts/{accept,quarantine,review}/<id>/
/// <root>/logs/audit.log
/// <root>/.tmp/
/// ```
#[derive(Debug, Clone)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    /// Layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Pipeline root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a location
    pub fn location_dir(&self, location: PipelineLocation) -> PathBuf {
        self.root.join(location.as_str())
    }

    /// Record directory of an artifact at a location
    pub fn record_dir(&self, id: ArtifactId, location: PipelineLocation) -> PathBuf {
        self.location_dir(location).join(id.to_string())
    }

    /// Verdict ledger directory for a decision
    pub fn verdict_dir(&self, decision: Decision) -> PathBuf {
        self.root
            .join("verdicts")
            .join(decision.as_str().to_lowercase())
    }

    /// Staging area for records under construction
    pub fn tmp_dir(&self) -> PathBuf {
        self.root.join(".tmp")
    }

    /// Log directory
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Append-only audit log
    pub fn audit_log(&self) -> PathBuf {
        self.logs_dir().join("audit.log")
    }

    /// Every directory that must exist before the store is usable
    pub fn all_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = PipelineLocation::ALL
            .iter()
            .map(|location| self.location_dir(*location))
            .collect();
        dirs.extend(
            [Decision::Accept, Decision::Quarantine, Decision::Review]
                .iter()
                .map(|decision| self.verdict_dir(*decision)),
        );
        dirs.push(self.tmp_dir());
        dirs.push(self.logs_dir());
        dirs
    }
}
