//! Pipeline location - the stage an artifact currently occupies

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage in the artifact lifecycle
///
/// Artifacts move forward through the pipeline:
/// - Inbox → Classifying → Staged → {Accepted, Quarantine, Review}
/// - Accepted → Archived (terminal)
///
/// The only backward move is Quarantine → Accepted (healing). Moving an
/// artifact between placements to enforce a ruling is a separate, opt-in
/// operation checked by [`PipelineLocation::can_reassign_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineLocation {
    /// Deposited by a collector, not yet claimed
    Inbox,
    /// Claimed by the classify stage
    Classifying,
    /// Classified, waiting for routing
    Staged,
    /// Trusted
    Accepted,
    /// Rejected or dangerous; subject to healing
    Quarantine,
    /// Held for manual review
    Review,
    /// Long-term storage for accepted artifacts
    Archived,
}

impl PipelineLocation {
    /// All locations, in pipeline order
    pub const ALL: [PipelineLocation; 7] = [
        PipelineLocation::Inbox,
        PipelineLocation::Classifying,
        PipelineLocation::Staged,
        PipelineLocation::Accepted,
        PipelineLocation::Quarantine,
        PipelineLocation::Review,
        PipelineLocation::Archived,
    ];

    /// The three placement states an artifact can end up in after routing
    pub const PLACED: [PipelineLocation; 3] = [
        PipelineLocation::Accepted,
        PipelineLocation::Quarantine,
        PipelineLocation::Review,
    ];

    /// Get the location name as a string (also its directory name)
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineLocation::Inbox => "inbox",
            PipelineLocation::Classifying => "classifying",
            PipelineLocation::Staged => "staged",
            PipelineLocation::Accepted => "accepted",
            PipelineLocation::Quarantine => "quarantine",
            PipelineLocation::Review => "review",
            PipelineLocation::Archived => "archived",
        }
    }

    /// Parse a location from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "inbox" => Some(PipelineLocation::Inbox),
            "classifying" => Some(PipelineLocation::Classifying),
            "staged" => Some(PipelineLocation::Staged),
            "accepted" => Some(PipelineLocation::Accepted),
            "quarantine" => Some(PipelineLocation::Quarantine),
            "review" => Some(PipelineLocation::Review),
            "archived" => Some(PipelineLocation::Archived),
            _ => None,
        }
    }

    /// Whether this is one of the post-routing placement states
    pub fn is_placed(&self) -> bool {
        Self::PLACED.contains(self)
    }

    /// Whether an artifact may be relocated from `self` to `to`
    pub fn can_transition_to(&self, to: PipelineLocation) -> bool {
        use PipelineLocation::*;

        match (*self, to) {
            (Inbox, Classifying) => true,
            (Classifying, Staged) => true,
            (Staged, dest) => dest.is_placed(),
            (Accepted, Archived) => true,
            (Quarantine, Accepted) => true,
            _ => false,
        }
    }

    /// Whether a ruling may move an artifact from placement `self` to `to`
    pub fn can_reassign_to(&self, to: PipelineLocation) -> bool {
        self.is_placed() && to.is_placed() && *self != to
    }
}

impl fmt::Display for PipelineLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PipelineLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid pipeline location: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelineLocation::*;

    #[test]
    fn test_forward_path() {
        assert!(Inbox.can_transition_to(Classifying));
        assert!(Classifying.can_transition_to(Staged));
        assert!(Staged.can_transition_to(Accepted));
        assert!(Staged.can_transition_to(Quarantine));
        assert!(Staged.can_transition_to(Review));
        assert!(Accepted.can_transition_to(Archived));
    }

    #[test]
    fn test_backward_moves_rejected() {
        assert!(!Classifying.can_transition_to(Inbox));
        assert!(!Staged.can_transition_to(Classifying));
        assert!(!Accepted.can_transition_to(Staged));
        assert!(!Archived.can_transition_to(Accepted));
    }

    #[test]
    fn test_archive_only_from_accepted() {
        for from in PipelineLocation::ALL {
            assert_eq!(from.can_transition_to(Archived), from == Accepted, "{from}");
        }
    }

    #[test]
    fn test_healing_is_the_only_backward_move() {
        assert!(Quarantine.can_transition_to(Accepted));
        assert!(!Accepted.can_transition_to(Quarantine));
        assert!(!Review.can_transition_to(Quarantine));
        assert!(!Review.can_transition_to(Accepted));
        assert!(!Quarantine.can_transition_to(Review));
        assert!(!Quarantine.can_transition_to(Quarantine));
    }

    #[test]
    fn test_reassign_between_placements() {
        assert!(Accepted.can_reassign_to(Quarantine));
        assert!(Review.can_reassign_to(Accepted));
        assert!(!Accepted.can_reassign_to(Accepted));
        assert!(!Staged.can_reassign_to(Accepted));
        assert!(!Accepted.can_reassign_to(Archived));
    }

    #[test]
    fn test_parse_roundtrip() {
        for location in PipelineLocation::ALL {
            assert_eq!(location.as_str().parse::<PipelineLocation>(), Ok(location));
        }
        assert!("shaken".parse::<PipelineLocation>().is_err());
    }
}
