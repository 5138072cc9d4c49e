//! Classification records produced by the scorer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trust category assigned by the scorer
///
/// Exactly one category is assigned per classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Honest, coherent, aligned content
    Truth,
    /// Evidence-structured, verifiable content
    Fact,
    /// Contradictory or manipulative content
    Lie,
    /// Hostile content (safety flag raised)
    LieHostile,
    /// Not enough signal to decide
    Unknown,
}

impl Category {
    /// All categories, in declaration order
    pub const ALL: [Category; 5] = [
        Category::Truth,
        Category::Fact,
        Category::Lie,
        Category::LieHostile,
        Category::Unknown,
    ];

    /// Get the category name as it appears in records and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Truth => "TRUTH",
            Category::Fact => "FACT",
            Category::Lie => "LIE",
            Category::LieHostile => "LIE_HOSTILE",
            Category::Unknown => "UNKNOWN",
        }
    }

    /// Parse a category name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRUTH" => Some(Category::Truth),
            "FACT" => Some(Category::Fact),
            "LIE" => Some(Category::Lie),
            "LIE_HOSTILE" => Some(Category::LieHostile),
            "UNKNOWN" => Some(Category::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score accumulators
///
/// Values are left un-normalised; individual families are capped by the scorer so
/// no single family dominates, but the sums are not rescaled into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Scores {
    /// Honesty / emotional truth signal
    pub truth: f64,
    /// Evidence structure signal
    pub fact: f64,
    /// Deception / contradiction signal
    pub lie: f64,
    /// Hostility signal (1.0 when the hostility override fired)
    pub hostility: f64,
    /// Affection signal
    pub love: f64,
}

/// Result of one classification pass over an artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Assigned category
    pub category: Category,

    /// Accumulated scores
    pub scores: Scores,

    /// Raised when the hostility override fired
    pub safety_flag: bool,

    /// Ordered tags naming every contributing pattern family
    pub reasons: Vec<String>,
}

impl ClassificationResult {
    /// Build the result for a hostility match
    ///
    /// This is the only constructor that raises the safety flag, which keeps
    /// `safety_flag => category == LieHostile && lie == 1.0` true by construction.
    pub fn hostile(reasons: Vec<String>) -> Self {
        Self {
            category: Category::LieHostile,
            scores: Scores {
                lie: 1.0,
                hostility: 1.0,
                ..Scores::default()
            },
            safety_flag: true,
            reasons,
        }
    }

    /// Build a non-hostile result from accumulated scores
    pub fn scored(category: Category, scores: Scores, reasons: Vec<String>) -> Self {
        Self {
            category,
            scores,
            safety_flag: false,
            reasons,
        }
    }

    /// Whether the record satisfies the safety-flag invariant
    ///
    /// Records read back from disk may have been edited by hand; callers that
    /// rely on the invariant can check it here.
    pub fn is_consistent(&self) -> bool {
        !self.safety_flag || (self.category == Category::LieHostile && self.scores.lie == 1.0)
    }

    /// Whether this result should be treated as hostile downstream
    pub fn is_hostile(&self) -> bool {
        self.safety_flag || self.category == Category::LieHostile
    }
}
