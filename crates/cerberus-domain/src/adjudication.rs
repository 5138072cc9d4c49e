//! Adjudication records produced by the final adjudicator

use crate::PipelineLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final ruling on an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Trusted; belongs in Accepted
    Accept,
    /// Rejected or dangerous; belongs in Quarantine
    Quarantine,
    /// Needs a human; belongs in Review
    Review,
}

impl Decision {
    /// Get the decision name as it appears in records and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "ACCEPT",
            Decision::Quarantine => "QUARANTINE",
            Decision::Review => "REVIEW",
        }
    }

    /// Pipeline location an artifact with this decision should occupy
    pub fn destination(&self) -> PipelineLocation {
        match self {
            Decision::Accept => PipelineLocation::Accepted,
            Decision::Quarantine => PipelineLocation::Quarantine,
            Decision::Review => PipelineLocation::Review,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of adjudicating one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjudicationDecision {
    /// The ruling
    pub decision: Decision,

    /// Number of covenant keywords present in the content
    pub covenant_score: u32,

    /// A danger keyword matched (forces Quarantine)
    pub danger_detected: bool,

    /// A deception phrase matched
    pub deception_detected: bool,

    /// Ordered explanation of the ruling
    pub reasons: Vec<String>,
}

impl AdjudicationDecision {
    /// Whether the danger-dominates invariant holds
    pub fn is_consistent(&self) -> bool {
        !self.danger_detected || self.decision == Decision::Quarantine
    }
}
