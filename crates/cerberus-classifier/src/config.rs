//! Classifier configuration
//!
//! Every weight and threshold the scorer uses lives here so deployments can tune
//! them from TOML instead of editing pattern code.

use crate::ClassifierError;
use cerberus_domain::PipelineLocation;
use serde::{Deserialize, Serialize};

/// Category decision thresholds
///
/// Checked in a fixed order: lie, then truth, then fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringThresholds {
    /// `lie > lie_dominant` ⇒ LIE
    pub lie_dominant: f64,

    /// `truth > fact && truth > truth_dominant` ⇒ TRUTH
    pub truth_dominant: f64,

    /// `fact > fact_dominant` ⇒ FACT
    pub fact_dominant: f64,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            lie_dominant: 0.5,
            truth_dominant: 0.3,
            fact_dominant: 0.3,
        }
    }
}

/// Per-family score contributions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Truth boost when affection matches
    pub affection_truth: f64,
    /// Love score when affection matches
    pub affection_love: f64,
    /// Truth boost when excited-truth matches
    pub excited_truth: f64,
    /// Truth added per truth-marker match
    pub truth_marker_step: f64,
    /// Cap on the truth-marker contribution
    pub truth_marker_cap: f64,
    /// Fact boost when any fact-structure phrase is present
    pub fact_structure: f64,
    /// Lie added per lie-indicator match
    pub lie_marker_step: f64,
    /// Cap on the lie-indicator contribution
    pub lie_marker_cap: f64,
    /// Lie boost when the contradiction pattern matches
    pub contradiction: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            affection_truth: 0.4,
            affection_love: 0.9,
            excited_truth: 0.3,
            truth_marker_step: 0.15,
            truth_marker_cap: 0.5,
            fact_structure: 0.4,
            lie_marker_step: 0.2,
            lie_marker_cap: 0.6,
            contradiction: 0.4,
        }
    }
}

/// Configuration for the classification stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Category thresholds
    pub thresholds: ScoringThresholds,

    /// Family weights
    pub weights: ScoringWeights,

    /// Trimmed content shorter than this is discarded as noise
    pub min_content_chars: usize,

    /// Where UNKNOWN artifacts are held (Review or Quarantine)
    pub unknown_destination: PipelineLocation,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            thresholds: ScoringThresholds::default(),
            weights: ScoringWeights::default(),
            min_content_chars: 2,
            unknown_destination: PipelineLocation::Review,
        }
    }
}

impl ClassifierConfig {
    /// Sensitive configuration: a lower lie threshold and UNKNOWN held in quarantine
    ///
    /// A contradiction on its own, or two lie indicators, is enough for LIE.
    pub fn sensitive() -> Self {
        Self {
            thresholds: ScoringThresholds {
                lie_dominant: 0.3,
                ..ScoringThresholds::default()
            },
            unknown_destination: PipelineLocation::Quarantine,
            ..Self::default()
        }
    }

    /// Check that thresholds and weights are usable
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let t = &self.thresholds;
        let w = &self.weights;
        let values = [
            ("thresholds.lie_dominant", t.lie_dominant),
            ("thresholds.truth_dominant", t.truth_dominant),
            ("thresholds.fact_dominant", t.fact_dominant),
            ("weights.affection_truth", w.affection_truth),
            ("weights.affection_love", w.affection_love),
            ("weights.excited_truth", w.excited_truth),
            ("weights.truth_marker_step", w.truth_marker_step),
            ("weights.truth_marker_cap", w.truth_marker_cap),
            ("weights.fact_structure", w.fact_structure),
            ("weights.lie_marker_step", w.lie_marker_step),
            ("weights.lie_marker_cap", w.lie_marker_cap),
            ("weights.contradiction", w.contradiction),
        ];

        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ClassifierError::Config(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }

        if !self.unknown_destination.is_placed() {
            return Err(ClassifierError::Config(format!(
                "unknown_destination must be accepted, quarantine or review (got {})",
                self.unknown_destination
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(config.thresholds.lie_dominant, 0.5);
        assert_eq!(config.thresholds.truth_dominant, 0.3);
        assert_eq!(config.thresholds.fact_dominant, 0.3);
        assert_eq!(config.min_content_chars, 2);
        assert_eq!(config.unknown_destination, PipelineLocation::Review);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sensitive_config() {
        let config = ClassifierConfig::sensitive();
        assert_eq!(config.thresholds.lie_dominant, 0.3);
        assert_eq!(config.unknown_destination, PipelineLocation::Quarantine);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClassifierConfig::default();
        config.weights.contradiction = f64::NAN;
        assert!(matches!(config.validate(), Err(ClassifierError::Config(_))));

        let mut config = ClassifierConfig::default();
        config.unknown_destination = PipelineLocation::Archived;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ClassifierConfig = toml::from_str(
            r#"
            unknown_destination = "quarantine"

            [thresholds]
            lie_dominant = 0.4
            "#,
        )
        .unwrap();

        assert_eq!(config.thresholds.lie_dominant, 0.4);
        assert_eq!(config.thresholds.fact_dominant, 0.3);
        assert_eq!(config.weights.truth_marker_cap, 0.5);
        assert_eq!(config.unknown_destination, PipelineLocation::Quarantine);
    }
}
