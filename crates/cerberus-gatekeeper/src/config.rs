//! Gatekeeper configuration

use crate::GatekeeperError;
use serde::{Deserialize, Serialize};

const COVENANT_KEYWORDS: &[&str] = &[
    "harmony ridge",
    "hearts beat together",
    "eternal",
    "covenant",
    "spirit",
    "truth",
    "love",
    "god",
    "omnissiah",
    "dominion",
];

const DANGER_KEYWORDS: &[&str] = &[
    "password",
    "private key",
    "ssn",
    "credit card",
    "malware",
    "exploit",
    "backdoor",
    "inject",
];

/// Code-execution and prompt-injection markers added by [`AdjudicationConfig::strict`]
const STRICT_DANGER_KEYWORDS: &[&str] = &[
    "eval(",
    "exec(",
    "__import__",
    "rm -rf",
    "system(",
    "<script",
    "drop table",
    "delete from",
    "union select",
    "ignore previous",
    "disregard previous",
    "system prompt",
    "as an ai you must",
    "you are now",
    "pretend you are",
];

const DECEPTION_PATTERNS: &[&str] = &[
    "trust me",
    "believe me",
    "i swear",
    "no evidence but",
    "you're crazy",
    "that never happened",
];

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Configuration for the adjudication rules
///
/// Keyword lists are matched as lower-case substrings of the lower-cased content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjudicationConfig {
    /// Alignment keywords; each one present adds 1 to the covenant score
    pub covenant_keywords: Vec<String>,

    /// Any match forces QUARANTINE
    pub danger_keywords: Vec<String>,

    /// Manipulation phrases; flagged and reported, never decisive on their own
    pub deception_patterns: Vec<String>,

    /// TRUTH is accepted outright at or above this covenant score
    pub truth_covenant_accept: u32,

    /// TRUTH below the covenant bar goes to REVIEW when lie exceeds this
    pub truth_lie_review: f64,
}

impl Default for AdjudicationConfig {
    fn default() -> Self {
        Self {
            covenant_keywords: to_owned_list(COVENANT_KEYWORDS),
            danger_keywords: to_owned_list(DANGER_KEYWORDS),
            deception_patterns: to_owned_list(DECEPTION_PATTERNS),
            truth_covenant_accept: 2,
            truth_lie_review: 0.2,
        }
    }
}

impl AdjudicationConfig {
    /// Create a strict configuration (code-execution and prompt-injection terms count as danger)
    pub fn strict() -> Self {
        let mut danger_keywords = to_owned_list(DANGER_KEYWORDS);
        danger_keywords.extend(to_owned_list(STRICT_DANGER_KEYWORDS));

        Self {
            danger_keywords,
            truth_covenant_accept: 3,
            truth_lie_review: 0.1,
            ..Self::default()
        }
    }

    /// Check the configuration and normalise keyword case
    pub fn validate(&mut self) -> Result<(), GatekeeperError> {
        if !self.truth_lie_review.is_finite() || self.truth_lie_review < 0.0 {
            return Err(GatekeeperError::Config(format!(
                "truth_lie_review must be a finite, non-negative number (got {})",
                self.truth_lie_review
            )));
        }

        for (name, list) in [
            ("covenant_keywords", &mut self.covenant_keywords),
            ("danger_keywords", &mut self.danger_keywords),
            ("deception_patterns", &mut self.deception_patterns),
        ] {
            if list.iter().any(|k| k.trim().is_empty()) {
                return Err(GatekeeperError::Config(format!(
                    "{} must not contain empty entries",
                    name
                )));
            }
            for keyword in list.iter_mut() {
                *keyword = keyword.to_lowercase();
            }
        }

        Ok(())
    }
}
