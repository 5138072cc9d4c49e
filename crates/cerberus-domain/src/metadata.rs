//! Metadata record kept alongside every artifact's content

use crate::{AdjudicationDecision, Artifact, ArtifactId, ClassificationResult, PipelineLocation, SourceKind};
use serde::{Deserialize, Serialize};

/// One recorded relocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Previous location (`None` for the initial deposit)
    pub from: Option<PipelineLocation>,

    /// New location
    pub to: PipelineLocation,

    /// When the move happened (seconds since Unix epoch)
    pub at: u64,

    /// Short tag explaining the move (e.g. "routed:LIE", "healed")
    pub reason: String,
}

/// Sibling metadata record for an artifact
///
/// Holds everything the pipeline has learned about the artifact: the
/// classification, every adjudication, and the full relocation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Artifact identifier
    pub id: ArtifactId,

    /// Capture time (seconds since Unix epoch)
    pub captured_at: u64,

    /// Collector that produced the artifact
    pub source_kind: SourceKind,

    /// Classification result, once classified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationResult>,

    /// Adjudication history, newest last
    #[serde(default)]
    pub adjudications: Vec<AdjudicationDecision>,

    /// Relocation history, newest last
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

impl ArtifactMetadata {
    /// Create the initial metadata record for a freshly captured artifact
    pub fn for_artifact(artifact: &Artifact) -> Self {
        Self {
            id: artifact.id,
            captured_at: artifact.captured_at,
            source_kind: artifact.source_kind,
            classification: None,
            adjudications: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Append a relocation to the history
    pub fn record_transition(
        &mut self,
        from: Option<PipelineLocation>,
        to: PipelineLocation,
        reason: impl Into<String>,
        at: u64,
    ) {
        self.transitions.push(Transition {
            from,
            to,
            at,
            reason: reason.into(),
        });
    }

    /// Most recent adjudication, if any
    pub fn latest_adjudication(&self) -> Option<&AdjudicationDecision> {
        self.adjudications.last()
    }

    /// Whether the artifact has been classified but not yet adjudicated
    pub fn needs_adjudication(&self) -> bool {
        self.classification.is_some() && self.adjudications.is_empty()
    }

    /// Time of the last relocation, falling back to capture time
    pub fn last_moved_at(&self) -> u64 {
        self.transitions
            .last()
            .map(|t| t.at)
            .unwrap_or(self.captured_at)
    }
}

/// An artifact as loaded from the store, with its metadata and location
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArtifact {
    /// Content record
    pub artifact: Artifact,

    /// Metadata record
    pub metadata: ArtifactMetadata,

    /// Current location
    pub location: PipelineLocation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, ClassificationResult, Decision, Scores};

    fn sample_artifact() -> Artifact {
        Artifact::new("the data shows a verified result", SourceKind::Manual, 1_000)
    }

    #[test]
    fn test_fresh_metadata() {
        let artifact = sample_artifact();
        let meta = ArtifactMetadata::for_artifact(&artifact);

        assert_eq!(meta.id, artifact.id);
        assert!(meta.classification.is_none());
        assert!(!meta.needs_adjudication());
        assert_eq!(meta.last_moved_at(), 1_000);
    }

    #[test]
    fn test_needs_adjudication_lifecycle() {
        let mut meta = ArtifactMetadata::for_artifact(&sample_artifact());
        meta.classification = Some(ClassificationResult::scored(
            Category::Fact,
            Scores::default(),
            vec!["fact_structure_2".to_string()],
        ));
        assert!(meta.needs_adjudication());

        meta.adjudications.push(AdjudicationDecision {
            decision: Decision::Accept,
            covenant_score: 0,
            danger_detected: false,
            deception_detected: false,
            reasons: vec!["Pure factual data".to_string()],
        });
        assert!(!meta.needs_adjudication());
        assert_eq!(meta.latest_adjudication().unwrap().decision, Decision::Accept);
    }

    #[test]
    fn test_transition_history() {
        let mut meta = ArtifactMetadata::for_artifact(&sample_artifact());
        meta.record_transition(None, PipelineLocation::Inbox, "deposited", 1_000);
        meta.record_transition(
            Some(PipelineLocation::Inbox),
            PipelineLocation::Classifying,
            "claimed",
            1_005,
        );

        assert_eq!(meta.transitions.len(), 2);
        assert_eq!(meta.last_moved_at(), 1_005);
    }

    #[test]
    fn test_metadata_json_omits_missing_classification() {
        let meta = ArtifactMetadata::for_artifact(&sample_artifact());
        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("classification"));

        let back: ArtifactMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
