//! Pattern-family scoring

use crate::patterns::Family;
use crate::{ClassifierConfig, ClassifierError};
use cerberus_domain::{Category, ClassificationResult, Scores};

/// Pure text scorer
///
/// Maps text to exactly one [`Category`] plus the accumulated scores and the
/// reason trail. Holds only configuration, so the same input always produces
/// the same result.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ClassifierConfig,
}

impl Scorer {
    /// Create a scorer with default thresholds and weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer from a validated configuration
    pub fn from_config(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Score a piece of text
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::EmptyInput`] for empty or whitespace-only text.
    pub fn score(&self, text: &str) -> Result<ClassificationResult, ClassifierError> {
        if text.trim().is_empty() {
            return Err(ClassifierError::EmptyInput);
        }

        let lowered = text.to_lowercase();

        // Hostility wins outright; nothing else may offset it.
        if Family::Hostility.matches(&lowered) {
            return Ok(ClassificationResult::hostile(vec![
                "hostility_detected".to_string(),
            ]));
        }

        let w = &self.config.weights;
        let mut scores = Scores::default();
        let mut reasons = Vec::new();

        // 1. Affection
        if Family::Affection.matches(&lowered) {
            scores.love = w.affection_love;
            scores.truth += w.affection_truth;
            reasons.push("affection_detected".to_string());
        }

        // 2. Excited truth
        if Family::ExcitedTruth.matches(&lowered) {
            scores.truth += w.excited_truth;
            reasons.push("emotional_honesty".to_string());
        }

        // 3. Truth markers, capped
        let truth_markers = Family::TruthMarkers.count(&lowered);
        if truth_markers > 0 {
            scores.truth += (truth_markers as f64 * w.truth_marker_step).min(w.truth_marker_cap);
            reasons.push(format!("truth_markers_{}", truth_markers));
        }

        // 4. Fact structure
        let fact_phrases = Family::FactStructure.count(&lowered);
        if fact_phrases > 0 {
            scores.fact += w.fact_structure;
            reasons.push(format!("fact_structure_{}", fact_phrases));
        }

        // 5. Lie indicators, capped
        let lie_markers = Family::LieIndicators.count(&lowered);
        if lie_markers > 0 {
            scores.lie += (lie_markers as f64 * w.lie_marker_step).min(w.lie_marker_cap);
            reasons.push(format!("lie_markers_{}", lie_markers));
        }

        // 6. Contradiction
        if Family::Contradiction.matches(&lowered) {
            scores.lie += w.contradiction;
            reasons.push("contradiction".to_string());
        }

        let category = self.decide(&scores);
        Ok(ClassificationResult::scored(category, scores, reasons))
    }

    /// Category decision in fixed precedence: lie, truth, fact, unknown
    fn decide(&self, scores: &Scores) -> Category {
        let t = &self.config.thresholds;

        if scores.lie > t.lie_dominant {
            Category::Lie
        } else if scores.truth > scores.fact && scores.truth > t.truth_dominant {
            Category::Truth
        } else if scores.fact > t.fact_dominant {
            Category::Fact
        } else {
            Category::Unknown
        }
    }
}
