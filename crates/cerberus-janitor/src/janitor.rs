//! Core Janitor implementation: healing, archiving and retention

use crate::healing::policy_for;
use crate::{JanitorConfig, JanitorError, JanitorMetrics};
use cerberus_domain::traits::{ArtifactStore, AuditEntry, AuditLevel, HealingPolicy};
use cerberus_domain::{current_timestamp, ArtifactId, Decision, PipelineLocation, StoredArtifact};
use cerberus_store::LeaseTable;
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, error, info};

/// Janitor service for quarantine healing and archive upkeep
///
/// Responsible for:
/// - Re-evaluating adjudicated quarantined artifacts for promotion to Accepted
/// - Archiving accepted artifacts once their ruling is final and they have aged
/// - Deleting Archived (and optionally Quarantine) records past retention
/// - Collecting metrics on cleanup operations
///
/// Every artifact is leased before it is touched. A failure on one artifact is
/// logged and counted, and the sweep continues with the next.
///
/// # Examples
///
/// ```no_run
/// use cerberus_janitor::{Janitor, JanitorConfig};
/// use cerberus_store::FsStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = FsStore::open("/var/lib/cerberus")?;
/// let mut janitor = Janitor::new(JanitorConfig::default());
///
/// // Perform a single sweep
/// let metrics = janitor.sweep(&store)?;
/// println!("{}", metrics.summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
    policy: Box<dyn HealingPolicy>,
    leases: LeaseTable,
    metrics: JanitorMetrics,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        let policy = policy_for(config.healing_policy);
        Self {
            config,
            policy,
            leases: LeaseTable::new(),
            metrics: JanitorMetrics::new(),
        }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Replace the healing policy
    pub fn with_policy(mut self, policy: Box<dyn HealingPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Share a lease table with the other pipeline stages
    pub fn with_leases(mut self, leases: LeaseTable) -> Self {
        self.leases = leases;
        self
    }

    /// The configuration in use
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Perform a complete sweep cycle
    ///
    /// 1. Heals quarantined artifacts the policy clears
    /// 2. Archives accepted artifacts past `archive_after_secs`
    /// 3. Compacts Archived and purges Quarantine past their retention windows
    ///
    /// Returns the updated metrics after the sweep. Errors only when a location
    /// cannot be listed at all.
    pub fn sweep<S: ArtifactStore>(&mut self, store: &S) -> Result<JanitorMetrics, JanitorError>
    where
        S::Error: Display,
    {
        self.sweep_at(store, current_timestamp())
    }

    /// Sweep as if the clock read `now` (seconds since Unix epoch)
    pub fn sweep_at<S: ArtifactStore>(
        &mut self,
        store: &S,
        now: u64,
    ) -> Result<JanitorMetrics, JanitorError>
    where
        S::Error: Display,
    {
        let start = Instant::now();

        if self.config.heal {
            self.heal_quarantine(store)?;
        }
        self.archive_accepted(store, now)?;
        if let Some(retention) = self.config.archive_retention() {
            self.expire(store, PipelineLocation::Archived, retention.as_secs(), now)?;
        }
        if let Some(retention) = self.config.quarantine_retention() {
            self.expire(store, PipelineLocation::Quarantine, retention.as_secs(), now)?;
        }

        self.metrics.record_sweep();
        self.metrics.total_runtime_ms += start.elapsed().as_millis() as u64;

        Ok(self.metrics.clone())
    }

    /// Promote quarantined artifacts the healing policy clears
    ///
    /// Only artifacts that already carry an adjudication are considered, so the
    /// final ruling always sees an artifact before healing can move it.
    fn heal_quarantine<S: ArtifactStore>(&mut self, store: &S) -> Result<(), JanitorError>
    where
        S::Error: Display,
    {
        let policy_name = self.policy.name();

        for id in list(store, PipelineLocation::Quarantine)? {
            let Some(_lease) = self.leases.try_acquire(id) else {
                self.metrics.skipped_leased += 1;
                continue;
            };

            let Some(stored) = self.load(store, id, PipelineLocation::Quarantine, "heal") else {
                continue;
            };
            if stored.metadata.latest_adjudication().is_none() {
                continue;
            }
            if !self.policy.can_heal(&stored.artifact, &stored.metadata) {
                continue;
            }

            if self.config.dry_run {
                info!(id = %id, policy = policy_name, "DRY RUN: Would heal artifact");
                continue;
            }

            let reason = format!("healed:{}", policy_name);
            let result = store
                .relocate(id, PipelineLocation::Quarantine, PipelineLocation::Accepted, &reason)
                .and_then(|_| {
                    store.append_audit(&AuditEntry::new(
                        AuditLevel::Info,
                        "HEALED",
                        id,
                        format!("policy {}", policy_name),
                    ))
                });
            match result {
                Ok(()) => {
                    info!(id = %id, policy = policy_name, "Healed quarantined artifact");
                    self.metrics.healed += 1;
                }
                Err(e) => self.record_failure(id, "heal", e),
            }
        }

        Ok(())
    }

    /// Archive accepted artifacts whose final ruling was ACCEPT
    fn archive_accepted<S: ArtifactStore>(&mut self, store: &S, now: u64) -> Result<(), JanitorError>
    where
        S::Error: Display,
    {
        let min_age = self.config.archive_after_secs;

        for id in list(store, PipelineLocation::Accepted)? {
            let Some(_lease) = self.leases.try_acquire(id) else {
                self.metrics.skipped_leased += 1;
                continue;
            };

            let Some(stored) = self.load(store, id, PipelineLocation::Accepted, "archive") else {
                continue;
            };
            let accepted = stored
                .metadata
                .latest_adjudication()
                .map(|ruling| ruling.decision == Decision::Accept)
                .unwrap_or(false);
            if !accepted || now.saturating_sub(stored.metadata.last_moved_at()) < min_age {
                continue;
            }

            if self.config.dry_run {
                info!(id = %id, "DRY RUN: Would archive artifact");
                continue;
            }

            let result = store
                .relocate(id, PipelineLocation::Accepted, PipelineLocation::Archived, "archived")
                .and_then(|_| {
                    store.append_audit(&AuditEntry::new(AuditLevel::Info, "ARCHIVED", id, "accepted"))
                });
            match result {
                Ok(()) => {
                    debug!(id = %id, "Archived artifact");
                    self.metrics.archived += 1;
                }
                Err(e) => self.record_failure(id, "archive", e),
            }
        }

        Ok(())
    }

    /// Delete records at `location` that have not moved for `retention_secs`
    fn expire<S: ArtifactStore>(
        &mut self,
        store: &S,
        location: PipelineLocation,
        retention_secs: u64,
        now: u64,
    ) -> Result<(), JanitorError>
    where
        S::Error: Display,
    {
        let (stage, event) = match location {
            PipelineLocation::Archived => ("compact", "COMPACTED"),
            _ => ("purge", "PURGED"),
        };

        for id in list(store, location)? {
            let Some(_lease) = self.leases.try_acquire(id) else {
                self.metrics.skipped_leased += 1;
                continue;
            };

            let Some(stored) = self.load(store, id, location, stage) else {
                continue;
            };
            if now.saturating_sub(stored.metadata.last_moved_at()) <= retention_secs {
                continue;
            }

            if self.config.dry_run {
                info!(id = %id, location = %location, "DRY RUN: Would delete expired artifact");
                continue;
            }

            let result = store.delete(id, location).and_then(|_| {
                store.append_audit(&AuditEntry::new(
                    AuditLevel::Info,
                    event,
                    id,
                    format!("retention expired in {}", location),
                ))
            });
            match result {
                Ok(()) => {
                    info!(id = %id, location = %location, "Deleted expired artifact");
                    match location {
                        PipelineLocation::Archived => self.metrics.compacted += 1,
                        _ => self.metrics.purged += 1,
                    }
                }
                Err(e) => self.record_failure(id, stage, e),
            }
        }

        Ok(())
    }

    fn load<S: ArtifactStore>(
        &mut self,
        store: &S,
        id: ArtifactId,
        location: PipelineLocation,
        stage: &str,
    ) -> Option<StoredArtifact>
    where
        S::Error: Display,
    {
        match store.load(id, location) {
            Ok(stored) => stored,
            Err(e) => {
                self.record_failure(id, stage, e);
                None
            }
        }
    }

    fn record_failure(&mut self, id: ArtifactId, stage: &str, e: impl Display) {
        error!(id = %id, stage, error = %e, "Janitor stage failed for artifact");
        self.metrics.failures += 1;
    }
}

fn list<S: ArtifactStore>(store: &S, location: PipelineLocation) -> Result<Vec<ArtifactId>, JanitorError>
where
    S::Error: Display,
{
    store
        .list(location)
        .map_err(|e| JanitorError::Store(format!("listing {}: {}", location, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FnHeal, NeverHeal};
    use cerberus_domain::{AdjudicationDecision, Artifact, ArtifactMetadata, SourceKind};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    // Mock store for testing
    #[derive(Default)]
    struct MockStore {
        records: Mutex<BTreeMap<ArtifactId, StoredArtifact>>,
        audit: Mutex<Vec<AuditEntry>>,
        fail_relocate: bool,
    }

    impl MockStore {
        fn insert(&self, location: PipelineLocation, decision: Option<Decision>, moved_at: u64) -> ArtifactId {
            let artifact = Artifact::new("content", SourceKind::Manual, moved_at);
            let mut metadata = ArtifactMetadata::for_artifact(&artifact);
            metadata.record_transition(None, location, "seeded", moved_at);
            if let Some(decision) = decision {
                metadata.adjudications.push(AdjudicationDecision {
                    decision,
                    covenant_score: 0,
                    danger_detected: false,
                    deception_detected: false,
                    reasons: vec![],
                });
            }
            let id = artifact.id;
            self.records.lock().unwrap().insert(
                id,
                StoredArtifact {
                    artifact,
                    metadata,
                    location,
                },
            );
            id
        }

        fn location_of(&self, id: ArtifactId) -> Option<PipelineLocation> {
            self.records.lock().unwrap().get(&id).map(|r| r.location)
        }
    }

    impl ArtifactStore for MockStore {
        type Error = String;

        fn deposit(&self, artifact: &Artifact) -> Result<ArtifactId, Self::Error> {
            Ok(artifact.id)
        }

        fn load(
            &self,
            id: ArtifactId,
            location: PipelineLocation,
        ) -> Result<Option<StoredArtifact>, Self::Error> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .get(&id)
                .filter(|r| r.location == location)
                .cloned())
        }

        fn list(&self, location: PipelineLocation) -> Result<Vec<ArtifactId>, Self::Error> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.location == location)
                .map(|r| r.artifact.id)
                .collect())
        }

        fn save_metadata(
            &self,
            _metadata: &ArtifactMetadata,
            _location: PipelineLocation,
        ) -> Result<(), Self::Error> {
            Ok(())
        }

        fn relocate(
            &self,
            id: ArtifactId,
            from: PipelineLocation,
            to: PipelineLocation,
            _reason: &str,
        ) -> Result<(), Self::Error> {
            if self.fail_relocate {
                return Err("disk full".to_string());
            }
            if !from.can_transition_to(to) {
                return Err(format!("invalid transition {} -> {}", from, to));
            }
            let mut records = self.records.lock().unwrap();
            let record = records
                .get_mut(&id)
                .filter(|r| r.location == from)
                .ok_or_else(|| "not found".to_string())?;
            record.location = to;
            Ok(())
        }

        fn delete(&self, id: ArtifactId, _location: PipelineLocation) -> Result<(), Self::Error> {
            self.records.lock().unwrap().remove(&id);
            Ok(())
        }

        fn reassign(
            &self,
            _id: ArtifactId,
            from: PipelineLocation,
            to: PipelineLocation,
            _reason: &str,
        ) -> Result<(), Self::Error> {
            Err(format!("janitor never reassigns {} -> {}", from, to))
        }

        fn copy_to_verdicts(
            &self,
            _metadata: &ArtifactMetadata,
            _location: PipelineLocation,
            _decision: Decision,
        ) -> Result<(), Self::Error> {
            Ok(())
        }

        fn append_audit(&self, entry: &AuditEntry) -> Result<(), Self::Error> {
            self.audit.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    const NOW: u64 = 10_000_000;

    #[test]
    fn test_heals_adjudicated_quarantine() {
        let store = MockStore::default();
        let id = store.insert(PipelineLocation::Quarantine, Some(Decision::Quarantine), NOW);

        let mut janitor = Janitor::default_config();
        let metrics = janitor.sweep_at(&store, NOW).unwrap();

        assert_eq!(metrics.healed, 1);
        assert_eq!(store.location_of(id), Some(PipelineLocation::Accepted));
        assert_eq!(store.audit.lock().unwrap()[0].event, "HEALED");
    }

    #[test]
    fn test_unadjudicated_quarantine_waits() {
        let store = MockStore::default();
        let id = store.insert(PipelineLocation::Quarantine, None, NOW);

        let mut janitor = Janitor::default_config();
        janitor.sweep_at(&store, NOW).unwrap();

        assert_eq!(store.location_of(id), Some(PipelineLocation::Quarantine));
    }

    #[test]
    fn test_never_heal_policy() {
        let store = MockStore::default();
        let id = store.insert(PipelineLocation::Quarantine, Some(Decision::Quarantine), NOW);

        let mut janitor = Janitor::default_config().with_policy(Box::new(NeverHeal));
        let metrics = janitor.sweep_at(&store, NOW).unwrap();

        assert_eq!(metrics.healed, 0);
        assert_eq!(store.location_of(id), Some(PipelineLocation::Quarantine));
    }

    #[test]
    fn test_healing_never_demotes() {
        let store = MockStore::default();
        let accepted = store.insert(PipelineLocation::Accepted, Some(Decision::Review), NOW);
        let review = store.insert(PipelineLocation::Review, Some(Decision::Review), NOW);

        // A policy that would heal anything it is shown
        let mut janitor =
            Janitor::default_config().with_policy(Box::new(FnHeal::new(|_: &Artifact, _: &ArtifactMetadata| true)));
        janitor.sweep_at(&store, NOW).unwrap();

        assert_eq!(store.location_of(accepted), Some(PipelineLocation::Accepted));
        assert_eq!(store.location_of(review), Some(PipelineLocation::Review));
    }

    #[test]
    fn test_archives_aged_accepted() {
        let store = MockStore::default();
        let old = store.insert(PipelineLocation::Accepted, Some(Decision::Accept), NOW - 7_200);
        let fresh = store.insert(PipelineLocation::Accepted, Some(Decision::Accept), NOW - 10);
        let pending = store.insert(PipelineLocation::Accepted, None, NOW - 7_200);

        let mut janitor = Janitor::default_config();
        let metrics = janitor.sweep_at(&store, NOW).unwrap();

        assert_eq!(metrics.archived, 1);
        assert_eq!(store.location_of(old), Some(PipelineLocation::Archived));
        assert_eq!(store.location_of(fresh), Some(PipelineLocation::Accepted));
        assert_eq!(store.location_of(pending), Some(PipelineLocation::Accepted));
    }

    #[test]
    fn test_compaction_respects_retention() {
        let store = MockStore::default();
        let expired = store.insert(PipelineLocation::Archived, Some(Decision::Accept), NOW - 40 * 86_400);
        let kept = store.insert(PipelineLocation::Archived, Some(Decision::Accept), NOW - 86_400);

        let mut janitor = Janitor::new(JanitorConfig::aggressive());
        let metrics = janitor.sweep_at(&store, NOW).unwrap();

        assert_eq!(metrics.compacted, 1);
        assert_eq!(store.location_of(expired), None);
        assert_eq!(store.location_of(kept), Some(PipelineLocation::Archived));
    }

    #[test]
    fn test_no_compaction_by_default() {
        let store = MockStore::default();
        let id = store.insert(PipelineLocation::Archived, Some(Decision::Accept), 0);

        Janitor::default_config().sweep_at(&store, NOW).unwrap();
        assert_eq!(store.location_of(id), Some(PipelineLocation::Archived));
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let store = MockStore::default();
        let id = store.insert(PipelineLocation::Quarantine, Some(Decision::Quarantine), NOW);

        let config = JanitorConfig {
            dry_run: true,
            ..JanitorConfig::aggressive()
        };
        let metrics = Janitor::new(config).sweep_at(&store, NOW).unwrap();

        assert_eq!(metrics.total_changed(), 0);
        assert_eq!(store.location_of(id), Some(PipelineLocation::Quarantine));
    }

    #[test]
    fn test_leased_artifacts_skipped() {
        let store = MockStore::default();
        let id = store.insert(PipelineLocation::Quarantine, Some(Decision::Quarantine), NOW);

        let leases = LeaseTable::new();
        let _held = leases.try_acquire(id).unwrap();

        let mut janitor = Janitor::default_config().with_leases(leases.clone());
        let metrics = janitor.sweep_at(&store, NOW).unwrap();

        assert_eq!(metrics.skipped_leased, 1);
        assert_eq!(store.location_of(id), Some(PipelineLocation::Quarantine));
    }

    #[test]
    fn test_failure_isolated_per_artifact() {
        let store = MockStore {
            fail_relocate: true,
            ..Default::default()
        };
        let first = store.insert(PipelineLocation::Quarantine, Some(Decision::Quarantine), NOW);
        let second = store.insert(PipelineLocation::Quarantine, Some(Decision::Quarantine), NOW);

        let mut janitor = Janitor::default_config();
        let metrics = janitor.sweep_at(&store, NOW).unwrap();

        assert_eq!(metrics.failures, 2);
        assert_eq!(metrics.sweep_count, 1);
        assert_eq!(store.location_of(first), Some(PipelineLocation::Quarantine));
        assert_eq!(store.location_of(second), Some(PipelineLocation::Quarantine));
    }

    #[test]
    fn test_metrics_accumulate_and_reset() {
        let store = MockStore::default();
        let mut janitor = Janitor::default_config();

        janitor.sweep_at(&store, NOW).unwrap();
        janitor.sweep_at(&store, NOW).unwrap();
        assert_eq!(janitor.metrics().sweep_count, 2);

        janitor.reset_metrics();
        assert_eq!(janitor.metrics().sweep_count, 0);
    }
}
