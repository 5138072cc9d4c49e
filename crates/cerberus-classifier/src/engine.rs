//! Classification engine: noise filtering around the scorer

use crate::{ClassifierConfig, ClassifierError, Scorer};
use cerberus_domain::{Artifact, ArtifactMetadata, ClassificationResult};
use tracing::info;

/// Why an artifact was dropped without being scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Trimmed content shorter than the configured minimum
    Noise {
        /// Trimmed length in characters
        chars: usize,
    },
}

/// Outcome of running the engine over one artifact
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    /// Scored
    Classified(ClassificationResult),
    /// Dropped as noise; no result is produced
    Discarded(DiscardReason),
}

impl ClassificationOutcome {
    /// The classification result, if the artifact was scored
    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            ClassificationOutcome::Classified(result) => Some(result),
            ClassificationOutcome::Discarded(_) => None,
        }
    }
}

/// Wraps the [`Scorer`] with the noise filter and structured logging
#[derive(Debug, Clone)]
pub struct ClassificationEngine {
    scorer: Scorer,
    min_content_chars: usize,
}

impl Default for ClassificationEngine {
    fn default() -> Self {
        Self {
            scorer: Scorer::new(),
            min_content_chars: ClassifierConfig::default().min_content_chars,
        }
    }
}

impl ClassificationEngine {
    /// Create an engine from configuration
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let min_content_chars = config.min_content_chars;
        Ok(Self {
            scorer: Scorer::from_config(config)?,
            min_content_chars,
        })
    }

    /// The wrapped scorer
    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Classify an artifact
    ///
    /// Emits one `info` event per artifact: either the classification with its
    /// id, category, scores and reasons, or the discard.
    pub fn classify(&self, artifact: &Artifact) -> Result<ClassificationOutcome, ClassifierError> {
        let chars = artifact.trimmed_len();
        if chars < self.min_content_chars.max(1) {
            info!(id = %artifact.id, chars, "Discarded noise artifact");
            return Ok(ClassificationOutcome::Discarded(DiscardReason::Noise { chars }));
        }

        let result = self.scorer.score(&artifact.content)?;

        info!(
            id = %artifact.id,
            category = %result.category,
            truth = result.scores.truth,
            fact = result.scores.fact,
            lie = result.scores.lie,
            hostility = result.scores.hostility,
            love = result.scores.love,
            safety_flag = result.safety_flag,
            reasons = ?result.reasons,
            "Classified artifact"
        );

        Ok(ClassificationOutcome::Classified(result))
    }

    /// Classify an artifact and record the result on its metadata
    ///
    /// Metadata is left untouched when the artifact is discarded.
    pub fn classify_into(
        &self,
        artifact: &Artifact,
        metadata: &mut ArtifactMetadata,
    ) -> Result<ClassificationOutcome, ClassifierError> {
        let outcome = self.classify(artifact)?;
        if let ClassificationOutcome::Classified(result) = &outcome {
            metadata.classification = Some(result.clone());
        }
        Ok(outcome)
    }
}
