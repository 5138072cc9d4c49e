//! Built-in healing policies

use crate::config::HealingPolicyKind;
use cerberus_domain::traits::HealingPolicy;
use cerberus_domain::{Artifact, ArtifactMetadata};

/// Promotes every quarantined artifact it is shown
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysHeal;

impl HealingPolicy for AlwaysHeal {
    fn can_heal(&self, _artifact: &Artifact, _metadata: &ArtifactMetadata) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "always"
    }
}

/// Never promotes
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverHeal;

impl HealingPolicy for NeverHeal {
    fn can_heal(&self, _artifact: &Artifact, _metadata: &ArtifactMetadata) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "never"
    }
}

/// Healing policy backed by a closure
///
/// ```
/// use cerberus_janitor::FnHeal;
///
/// // Only heal artifacts whose final ruling saw no deception
/// let policy = FnHeal::new(|_artifact, meta| {
///     meta.latest_adjudication()
///         .map(|ruling| !ruling.deception_detected)
///         .unwrap_or(false)
/// });
/// # let _ = policy;
/// ```
pub struct FnHeal<F> {
    predicate: F,
}

impl<F> FnHeal<F>
where
    F: Fn(&Artifact, &ArtifactMetadata) -> bool + Send + Sync,
{
    /// Wrap a predicate
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> HealingPolicy for FnHeal<F>
where
    F: Fn(&Artifact, &ArtifactMetadata) -> bool + Send + Sync,
{
    fn can_heal(&self, artifact: &Artifact, metadata: &ArtifactMetadata) -> bool {
        (self.predicate)(artifact, metadata)
    }
}

/// Build the policy named in configuration
pub fn policy_for(kind: HealingPolicyKind) -> Box<dyn HealingPolicy> {
    match kind {
        HealingPolicyKind::Always => Box::new(AlwaysHeal),
        HealingPolicyKind::Never => Box::new(NeverHeal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerberus_domain::SourceKind;

    fn sample() -> (Artifact, ArtifactMetadata) {
        let artifact = Artifact::new("trust me", SourceKind::Manual, 1_000);
        let metadata = ArtifactMetadata::for_artifact(&artifact);
        (artifact, metadata)
    }

    #[test]
    fn test_builtin_policies() {
        let (artifact, metadata) = sample();
        assert!(AlwaysHeal.can_heal(&artifact, &metadata));
        assert!(!NeverHeal.can_heal(&artifact, &metadata));
        assert_eq!(policy_for(HealingPolicyKind::Never).name(), "never");
    }

    #[test]
    fn test_closure_policy() {
        let (artifact, metadata) = sample();
        let policy = FnHeal::new(|a: &Artifact, _: &ArtifactMetadata| a.content.len() > 100);
        assert!(!policy.can_heal(&artifact, &metadata));
        assert_eq!(policy.name(), "custom");
    }
}
