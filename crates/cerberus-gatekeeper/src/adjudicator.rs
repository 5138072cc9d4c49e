//! Final adjudication rules

use crate::{AdjudicationConfig, GatekeeperError};
use cerberus_domain::{AdjudicationDecision, Category, ClassificationResult, Decision};
use tracing::debug;

/// The Adjudicator re-examines placed artifacts and has the final word
///
/// Rules are applied in a fixed order:
/// 1. danger keywords veto everything (QUARANTINE, no further rules)
/// 2. deception phrases are flagged and reported
/// 3. covenant keywords are counted
/// 4. a decision table keyed on the stored category
#[derive(Debug, Clone, Default)]
pub struct Adjudicator {
    config: AdjudicationConfig,
}

impl Adjudicator {
    /// Create an adjudicator with the given configuration
    pub fn new(mut config: AdjudicationConfig) -> Result<Self, GatekeeperError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an adjudicator with the strict preset
    pub fn strict() -> Self {
        Self {
            config: AdjudicationConfig::strict(),
        }
    }

    /// The configuration in use
    pub fn config(&self) -> &AdjudicationConfig {
        &self.config
    }

    /// Adjudicate raw content against its stored classification
    pub fn adjudicate(&self, content: &str, classification: &ClassificationResult) -> AdjudicationDecision {
        let lowered = content.to_lowercase();
        let mut reasons = Vec::new();

        // 1. Danger veto
        if let Some(keyword) = first_match(&lowered, &self.config.danger_keywords) {
            debug!(keyword, "Danger keyword matched");
            return AdjudicationDecision {
                decision: Decision::Quarantine,
                covenant_score: 0,
                danger_detected: true,
                deception_detected: false,
                reasons: vec![format!("DANGER: {}", keyword)],
            };
        }

        // 2. Deception
        let deception = first_match(&lowered, &self.config.deception_patterns);
        if let Some(pattern) = deception {
            reasons.push(format!("DECEPTION: {}", pattern));
        }

        // 3. Covenant alignment
        let covenant_score = self
            .config
            .covenant_keywords
            .iter()
            .filter(|keyword| lowered.contains(keyword.as_str()))
            .count() as u32;

        // 4. Decision table
        let (decision, reason) = self.rule(classification, covenant_score);
        reasons.push(reason.to_string());

        AdjudicationDecision {
            decision,
            covenant_score,
            danger_detected: false,
            deception_detected: deception.is_some(),
            reasons,
        }
    }

    fn rule(&self, classification: &ClassificationResult, covenant_score: u32) -> (Decision, &'static str) {
        if classification.safety_flag {
            return (Decision::Quarantine, "Hostile content detected");
        }

        match classification.category {
            Category::LieHostile => (Decision::Quarantine, "Hostile content detected"),
            Category::Lie if covenant_score > 0 => (
                Decision::Review,
                "Lie with covenant markers - needs human review",
            ),
            Category::Lie => (Decision::Quarantine, "Deceptive content"),
            Category::Fact => (Decision::Accept, "Pure factual data"),
            Category::Truth if covenant_score >= self.config.truth_covenant_accept => {
                (Decision::Accept, "High covenant alignment")
            }
            Category::Truth if classification.scores.lie > self.config.truth_lie_review => (
                Decision::Review,
                "Truth with lie markers - review needed",
            ),
            Category::Truth => (Decision::Accept, "Pure truth - covenant aligned"),
            Category::Unknown => (
                Decision::Review,
                "Unknown classification - manual review needed",
            ),
        }
    }
}

fn first_match<'a>(haystack: &str, needles: &'a [String]) -> Option<&'a str> {
    needles
        .iter()
        .map(String::as_str)
        .find(|needle| haystack.contains(needle))
}
