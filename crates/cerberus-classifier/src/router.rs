//! Stage router: classification to destination

use crate::ClassifierError;
use cerberus_domain::{Category, ClassificationResult, PipelineLocation};

/// Maps a classified artifact to the location it should be placed in
///
/// | category                   | destination          |
/// |----------------------------|----------------------|
/// | LIE_HOSTILE / safety flag  | Quarantine           |
/// | LIE                        | Quarantine           |
/// | TRUTH, FACT                | Accepted             |
/// | UNKNOWN                    | configured (Review)  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRouter {
    unknown_destination: PipelineLocation,
}

impl Default for StageRouter {
    fn default() -> Self {
        Self {
            unknown_destination: PipelineLocation::Review,
        }
    }
}

impl StageRouter {
    /// Create a router holding UNKNOWN artifacts at `unknown_destination`
    ///
    /// # Errors
    ///
    /// The destination must be one of the placed locations.
    pub fn new(unknown_destination: PipelineLocation) -> Result<Self, ClassifierError> {
        if !unknown_destination.is_placed() {
            return Err(ClassifierError::Config(format!(
                "UNKNOWN cannot be routed to {}",
                unknown_destination
            )));
        }
        Ok(Self {
            unknown_destination,
        })
    }

    /// Where UNKNOWN artifacts are held
    pub fn unknown_destination(&self) -> PipelineLocation {
        self.unknown_destination
    }

    /// Destination for a category and safety flag
    pub fn route(&self, category: Category, safety_flag: bool) -> PipelineLocation {
        if safety_flag {
            return PipelineLocation::Quarantine;
        }

        match category {
            Category::LieHostile | Category::Lie => PipelineLocation::Quarantine,
            Category::Truth | Category::Fact => PipelineLocation::Accepted,
            Category::Unknown => self.unknown_destination,
        }
    }

    /// Destination for a full classification result
    pub fn route_result(&self, result: &ClassificationResult) -> PipelineLocation {
        self.route(result.category, result.safety_flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_routing_table() {
        let router = StageRouter::default();
        assert_eq!(router.route(Category::LieHostile, true), PipelineLocation::Quarantine);
        assert_eq!(router.route(Category::Lie, false), PipelineLocation::Quarantine);
        assert_eq!(router.route(Category::Truth, false), PipelineLocation::Accepted);
        assert_eq!(router.route(Category::Fact, false), PipelineLocation::Accepted);
        assert_eq!(router.route(Category::Unknown, false), PipelineLocation::Review);
    }

    #[test]
    fn test_safety_flag_dominates() {
        let router = StageRouter::default();
        assert_eq!(router.route(Category::Fact, true), PipelineLocation::Quarantine);
    }

    #[test]
    fn test_strict_unknown_holding() {
        let router = StageRouter::new(PipelineLocation::Quarantine).unwrap();
        assert_eq!(router.route(Category::Unknown, false), PipelineLocation::Quarantine);
    }

    #[test]
    fn test_unplaced_unknown_destination_rejected() {
        assert!(StageRouter::new(PipelineLocation::Staged).is_err());
        assert!(StageRouter::new(PipelineLocation::Archived).is_err());
        assert!(StageRouter::new(PipelineLocation::Inbox).is_err());
    }

    #[test]
    fn test_route_hostile_result() {
        let result = ClassificationResult::hostile(vec!["hostility_detected".to_string()]);
        assert_eq!(
            StageRouter::default().route_result(&result),
            PipelineLocation::Quarantine
        );
    }

    proptest! {
        #[test]
        fn prop_router_is_total(
            idx in 0..Category::ALL.len(),
            safety_flag in any::<bool>(),
            unknown_idx in 0..PipelineLocation::PLACED.len(),
        ) {
            let router = StageRouter::new(PipelineLocation::PLACED[unknown_idx]).unwrap();
            let destination = router.route(Category::ALL[idx], safety_flag);
            prop_assert!(destination.is_placed());
            if safety_flag {
                prop_assert_eq!(destination, PipelineLocation::Quarantine);
            }
        }
    }
}
