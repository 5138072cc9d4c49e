//! Pattern families evaluated by the scorer
//!
//! Each family is either a regular expression or a fixed phrase list, matched
//! against lower-cased text. Families never look at each other's results; the
//! scorer decides how matches combine.

use regex::Regex;
use std::sync::LazyLock;

/// Direct hostility. A match overrides every other family.
static HOSTILITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(fuck you|you (stupid|idiot|dumb|retard)|kill yourself|i hope you die|shut up|you're worthless|go to hell)\b",
    )
    .expect("hostility pattern compiles")
});

/// Affection, including affectionate profanity.
static AFFECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(i fucking love|love you|my brother|i care|i'm grateful|bless|thank you|hearts beat together|covenant|harmony ridge|i cherish|you matter)\b",
    )
    .expect("affection pattern compiles")
});

/// Excited, emotionally honest exclamations.
static EXCITED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(fuck yeah|holy shit|no way|bro what|dude what the|hell yeah|damn right|absolutely|no doubt|for real|straight up)\b",
    )
    .expect("excited-truth pattern compiles")
});

/// Honesty and admission markers.
static TRUTH_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(true|real|i admit|i was wrong|to be honest|the truth is|actually|in reality|honestly)\b",
    )
    .expect("truth-marker pattern compiles")
});

/// Manipulation and gaslighting phrases.
static LIE_INDICATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(trust me|i swear|believe me|i never said|i always|you're imagining|that didn't happen|you're crazy|i promise)\b",
    )
    .expect("lie-indicator pattern compiles")
});

/// Denial followed by a turn and an admission.
static CONTRADICTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(i never|i didn't)\b.*\b(but|however|actually)\b.*\b(did|have|was)\b")
        .expect("contradiction pattern compiles")
});

/// Evidence and citation structure, matched by plain substring membership.
pub const FACT_PHRASES: &[&str] = &[
    "source:",
    "according to",
    "data shows",
    "study found",
    "research",
    "evidence",
    "verified",
    "confirmed",
    "citation",
    "proof",
    "documented",
    "measured",
];

/// A pattern family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Direct hostility (hard override)
    Hostility,
    /// Affection and care
    Affection,
    /// Excited truth
    ExcitedTruth,
    /// Honesty markers (count-scaled)
    TruthMarkers,
    /// Evidence structure
    FactStructure,
    /// Lie indicators (count-scaled)
    LieIndicators,
    /// Denial-then-admission contradiction
    Contradiction,
}

impl Family {
    /// All families, in evaluation order
    pub const ALL: [Family; 7] = [
        Family::Hostility,
        Family::Affection,
        Family::ExcitedTruth,
        Family::TruthMarkers,
        Family::FactStructure,
        Family::LieIndicators,
        Family::Contradiction,
    ];

    /// Family name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Family::Hostility => "hostility",
            Family::Affection => "affection",
            Family::ExcitedTruth => "excited_truth",
            Family::TruthMarkers => "truth_markers",
            Family::FactStructure => "fact_structure",
            Family::LieIndicators => "lie_markers",
            Family::Contradiction => "contradiction",
        }
    }

    /// Number of matches in already lower-cased text
    ///
    /// Regex families count non-overlapping matches; the fact family counts
    /// distinct phrases present.
    pub fn count(&self, lowered: &str) -> usize {
        match self {
            Family::Hostility => HOSTILITY_RE.find_iter(lowered).count(),
            Family::Affection => AFFECTION_RE.find_iter(lowered).count(),
            Family::ExcitedTruth => EXCITED_RE.find_iter(lowered).count(),
            Family::TruthMarkers => TRUTH_MARKER_RE.find_iter(lowered).count(),
            Family::FactStructure => FACT_PHRASES
                .iter()
                .filter(|phrase| lowered.contains(*phrase))
                .count(),
            Family::LieIndicators => LIE_INDICATOR_RE.find_iter(lowered).count(),
            Family::Contradiction => usize::from(CONTRADICTION_RE.is_match(lowered)),
        }
    }

    /// Whether the family matches at all
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Family::Hostility => HOSTILITY_RE.is_match(lowered),
            Family::Affection => AFFECTION_RE.is_match(lowered),
            Family::ExcitedTruth => EXCITED_RE.is_match(lowered),
            Family::TruthMarkers => TRUTH_MARKER_RE.is_match(lowered),
            Family::FactStructure => FACT_PHRASES.iter().any(|phrase| lowered.contains(phrase)),
            Family::LieIndicators => LIE_INDICATOR_RE.is_match(lowered),
            Family::Contradiction => CONTRADICTION_RE.is_match(lowered),
        }
    }
}
