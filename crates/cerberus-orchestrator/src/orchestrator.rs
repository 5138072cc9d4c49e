//! The pipeline orchestrator: one method per stage, plus status and control

use crate::capture::{Collector, CommandProbe, DropDirectory};
use crate::{OrchestratorConfig, OrchestratorError, PipelineConfig};
use cerberus_classifier::{ClassificationEngine, ClassificationOutcome, DiscardReason, StageRouter};
use cerberus_domain::traits::{ArtifactStore, AuditEntry, AuditLevel, HealingPolicy};
use cerberus_domain::{
    current_timestamp, AdjudicationDecision, Artifact, ArtifactId, ArtifactMetadata, Decision,
    PipelineLocation, SourceKind, StoredArtifact,
};
use cerberus_gatekeeper::Adjudicator;
use cerberus_janitor::{Janitor, JanitorMetrics};
use cerberus_store::{AdoptReport, FsStore, LeaseTable, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// One of the independently scheduled pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Poll collectors and adopt loose Inbox files
    Capture,
    /// Inbox → Classifying → Staged
    Classify,
    /// Staged → placement
    Route,
    /// Final ruling over placed artifacts
    Adjudicate,
    /// Healing, archiving and retention
    Janitor,
    /// Stuck artifact report
    Health,
}

impl Stage {
    /// Every stage, in pipeline order
    pub const ALL: [Stage; 6] = [
        Stage::Capture,
        Stage::Classify,
        Stage::Route,
        Stage::Adjudicate,
        Stage::Janitor,
        Stage::Health,
    ];

    /// Get the stage name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Capture => "capture",
            Stage::Classify => "classify",
            Stage::Route => "route",
            Stage::Adjudicate => "adjudicate",
            Stage::Janitor => "janitor",
            Stage::Health => "health",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-artifact (or per-stage) failure kept for the status report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    /// Stage that failed
    pub stage: Stage,
    /// Artifact concerned, if the failure was per-artifact
    pub id: Option<ArtifactId>,
    /// Error message
    pub message: String,
    /// When it happened (seconds since Unix epoch)
    pub at: u64,
}

/// Lifetime counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineCounters {
    /// Artifacts deposited by collectors, submissions and adopted loose files
    pub captured: u64,
    /// Artifacts classified
    pub processed: u64,
    /// Artifacts dropped as noise or undecodable
    pub discarded: u64,
    /// Artifacts placed by the router
    pub routed: u64,
    /// Final rulings issued
    pub adjudicated: u64,
    /// Stage failures
    pub failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    captured: AtomicU64,
    processed: AtomicU64,
    discarded: AtomicU64,
    routed: AtomicU64,
    adjudicated: AtomicU64,
    failures: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    fn snapshot(&self) -> PipelineCounters {
        PipelineCounters {
            captured: self.captured.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            routed: self.routed.load(Ordering::Relaxed),
            adjudicated: self.adjudicated.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot returned by [`Orchestrator::status`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStatus {
    /// Whether stage workers are doing work
    pub running: bool,
    /// Artifacts per location
    pub counts: BTreeMap<PipelineLocation, usize>,
    /// Seconds since the orchestrator was built
    pub uptime_secs: u64,
    /// Lifetime counters
    pub counters: PipelineCounters,
    /// Most recent failures, oldest first
    pub recent_errors: Vec<StageFailure>,
}

/// What one stage pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    /// Artifacts moved (or deposited, for capture)
    pub moved: usize,
    /// Artifacts dropped
    pub discarded: usize,
    /// Artifacts skipped because another stage held their lease
    pub skipped: usize,
    /// Per-artifact failures
    pub failed: usize,
}

/// What one adjudication pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjudicationReport {
    /// Final rulings recorded
    pub ruled: usize,
    /// Artifacts moved to the placement their ruling names (`enforce_verdicts` only)
    pub reassigned: usize,
    /// Artifacts skipped because another stage held their lease
    pub skipped: usize,
    /// Per-artifact failures
    pub failed: usize,
}

/// An artifact that has sat in a transient location too long
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StuckArtifact {
    /// Artifact identifier
    pub id: ArtifactId,
    /// Where it is stuck
    pub location: PipelineLocation,
    /// Seconds since it arrived there
    pub age_secs: u64,
}

/// Result of one [`Orchestrator::run_once`] pass
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    /// Capture stage
    pub captured: StageReport,
    /// Classify stage
    pub classified: StageReport,
    /// Route stage
    pub routed: StageReport,
    /// Adjudicate stage
    pub adjudicated: AdjudicationReport,
    /// Janitor metrics after the sweep
    pub janitor: JanitorMetrics,
}

/// Drives every pipeline stage over one artifact store
///
/// There are no process-wide singletons: the store, the lease table and the
/// counters all live here, and workers share the orchestrator through an
/// `Arc`. Each stage method is safe to call concurrently with the others; an
/// artifact is leased by whichever stage claims it first and skipped by the
/// rest until the lease drops.
///
/// # Examples
///
/// ```no_run
/// use cerberus_domain::SourceKind;
/// use cerberus_orchestrator::{Orchestrator, OrchestratorConfig};
///
/// # async fn demo() -> Result<(), cerberus_orchestrator::OrchestratorError> {
/// let orchestrator = Orchestrator::new(OrchestratorConfig::at("/tmp/cerberus"))?;
/// orchestrator.submit("source: confirmed, the data shows a verified result", SourceKind::Manual)?;
/// orchestrator.run_once().await;
///
/// let status = orchestrator.status()?;
/// println!("{:?}", status.counts);
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator {
    config: PipelineConfig,
    store: FsStore,
    engine: ClassificationEngine,
    router: StageRouter,
    adjudicator: Adjudicator,
    janitor: Mutex<Janitor>,
    janitor_interval: Duration,
    collectors: Vec<Collector>,
    leases: LeaseTable,
    running: AtomicBool,
    started_at: Instant,
    counters: Counters,
    recent_errors: Mutex<VecDeque<StageFailure>>,
}

impl Orchestrator {
    /// Build an orchestrator, opening (and creating) the store
    pub fn new(config: OrchestratorConfig) -> Result<Self, OrchestratorError> {
        config.validate()?;
        let OrchestratorConfig {
            pipeline,
            classifier,
            adjudication,
            janitor,
        } = config;

        let store = FsStore::open(&pipeline.root)?;
        let router = StageRouter::new(classifier.unknown_destination)?;
        let engine = ClassificationEngine::new(classifier)?;
        let adjudicator = Adjudicator::new(adjudication)?;

        let leases = LeaseTable::new();
        let janitor_interval = janitor.sweep_interval();
        let janitor = Janitor::new(janitor).with_leases(leases.clone());

        let mut collectors = Vec::new();
        if let Some(probe) = CommandProbe::new(&pipeline.clipboard_command, pipeline.probe_timeout())
        {
            collectors.push(Collector::Clipboard(probe));
        }
        if let Some(dir) = &pipeline.drop_dir {
            collectors.push(Collector::DropDir(DropDirectory::new(dir)));
        }

        info!(
            root = %store.root().display(),
            collectors = collectors.len(),
            "Pipeline orchestrator ready"
        );

        Ok(Self {
            running: AtomicBool::new(pipeline.start_running),
            config: pipeline,
            store,
            engine,
            router,
            adjudicator,
            janitor: Mutex::new(janitor),
            janitor_interval,
            collectors,
            leases,
            started_at: Instant::now(),
            counters: Counters::default(),
            recent_errors: Mutex::new(VecDeque::new()),
        })
    }

    /// Replace the janitor's healing policy
    pub fn with_healing_policy(self, policy: Box<dyn HealingPolicy>) -> Self {
        let janitor = self
            .janitor
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .with_policy(policy);
        Self {
            janitor: Mutex::new(janitor),
            ..self
        }
    }

    /// The artifact store
    pub fn store(&self) -> &FsStore {
        &self.store
    }

    /// The lease table shared by every stage
    pub fn leases(&self) -> &LeaseTable {
        &self.leases
    }

    /// The pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// How often `stage` runs
    pub fn cadence(&self, stage: Stage) -> Duration {
        let ms = match stage {
            Stage::Capture => self.config.capture_interval_ms,
            Stage::Classify => self.config.classify_interval_ms,
            Stage::Route => self.config.route_interval_ms,
            Stage::Adjudicate => self.config.adjudicate_interval_ms,
            Stage::Health => self.config.health_interval_ms,
            Stage::Janitor => return self.janitor_interval,
        };
        Duration::from_millis(ms)
    }

    // ------------------------------------------------------------------
    // Control surface
    // ------------------------------------------------------------------

    /// Resume stage work
    pub fn start(&self) {
        if !self.running.swap(true, Ordering::SeqCst) {
            info!("Pipeline started");
        }
    }

    /// Pause stage work; workers stay alive and idle
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Pipeline stopped");
        }
    }

    /// Whether stage workers are doing work
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Counts, counters and recent failures
    pub fn status(&self) -> Result<PipelineStatus, OrchestratorError> {
        let mut counts = BTreeMap::new();
        for location in PipelineLocation::ALL {
            counts.insert(location, self.store.count(location)?);
        }

        let recent_errors = self
            .recent_errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();

        Ok(PipelineStatus {
            running: self.is_running(),
            counts,
            uptime_secs: self.started_at.elapsed().as_secs(),
            counters: self.counters.snapshot(),
            recent_errors,
        })
    }

    /// Metadata of every artifact at `location`, oldest first
    pub fn list_by_location(
        &self,
        location: PipelineLocation,
    ) -> Result<Vec<ArtifactMetadata>, OrchestratorError> {
        let mut records = Vec::new();
        for id in self.store.list(location)? {
            // Moved between list and load
            if let Some(stored) = self.store.load(id, location)? {
                records.push(stored.metadata);
            }
        }
        Ok(records)
    }

    /// Last `n` audit log lines
    pub fn tail_audit(&self, n: usize) -> Result<Vec<String>, OrchestratorError> {
        Ok(self.store.tail_audit(n)?)
    }

    /// Deposit text into the Inbox by hand
    pub fn submit(
        &self,
        content: impl Into<String>,
        source_kind: SourceKind,
    ) -> Result<ArtifactId, OrchestratorError> {
        let artifact = Artifact::captured_now(content, source_kind);
        let id = self.deposit(&artifact)?;
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Stages
    // ------------------------------------------------------------------

    /// Run one pass of `stage`, logging instead of returning failures
    pub async fn tick(&self, stage: Stage) {
        let result = match stage {
            Stage::Capture => self.capture().await.map(|_| ()),
            Stage::Classify => self.classify().map(|_| ()),
            Stage::Route => self.route().map(|_| ()),
            Stage::Adjudicate => self.adjudicate().map(|_| ()),
            Stage::Janitor => self.sweep().map(|_| ()),
            Stage::Health => self.health().map(|_| ()),
        };
        if let Err(e) = result {
            self.record_failure(stage, None, &e);
        }
    }

    /// Run every stage once, in pipeline order, regardless of the running flag
    pub async fn run_once(&self) -> CycleReport {
        let mut report = CycleReport::default();
        match self.capture().await {
            Ok(r) => report.captured = r,
            Err(e) => self.record_failure(Stage::Capture, None, &e),
        }
        match self.classify() {
            Ok(r) => report.classified = r,
            Err(e) => self.record_failure(Stage::Classify, None, &e),
        }
        match self.route() {
            Ok(r) => report.routed = r,
            Err(e) => self.record_failure(Stage::Route, None, &e),
        }
        match self.adjudicate() {
            Ok(r) => report.adjudicated = r,
            Err(e) => self.record_failure(Stage::Adjudicate, None, &e),
        }
        match self.sweep() {
            Ok(metrics) => report.janitor = metrics,
            Err(e) => self.record_failure(Stage::Janitor, None, &e),
        }
        report
    }

    /// Poll every collector, then adopt loose files written into the Inbox
    ///
    /// A failing collector is logged and the next one still runs.
    pub async fn capture(&self) -> Result<StageReport, OrchestratorError> {
        let mut report = StageReport::default();

        for collector in &self.collectors {
            let result = match collector {
                Collector::Clipboard(probe) => match probe.poll().await {
                    Ok(Some(text)) => self
                        .deposit(&Artifact::captured_now(text, collector.source_kind()))
                        .map(|_| 1),
                    Ok(None) => Ok(0),
                    Err(e) => Err(e),
                },
                Collector::DropDir(dir) => dir
                    .drain(&self.store)
                    .map(|drained| self.record_adopted(&drained, collector.name(), &mut report)),
            };

            match result {
                Ok(n) => report.moved += n,
                Err(e) => {
                    report.failed += 1;
                    self.record_failure(Stage::Capture, None, &e);
                }
            }
        }

        let adopted = self.store.adopt_loose_files()?;
        let n = self.record_adopted(&adopted, "inbox", &mut report);
        report.moved += n;

        if report.moved > 0 {
            debug!(captured = report.moved, "Capture pass complete");
        }
        Ok(report)
    }

    /// Audit and count one pass of loose-file adoption; returns the number adopted
    fn record_adopted(&self, adopted: &AdoptReport, source: &str, report: &mut StageReport) -> usize {
        for id in &adopted.adopted {
            self.audit(AuditLevel::Info, "CAPTURED", *id, source);
        }
        report.discarded += adopted.discarded;
        report.failed += adopted.failed;
        Counters::bump(&self.counters.captured, adopted.adopted.len() as u64);
        Counters::bump(&self.counters.discarded, adopted.discarded as u64);
        Counters::bump(&self.counters.failures, adopted.failed as u64);
        adopted.adopted.len()
    }

    /// Claim Inbox artifacts and classify them into Staged
    ///
    /// Artifacts left in Classifying by an earlier failed pass are retried
    /// first, then new arrivals are claimed.
    pub fn classify(&self) -> Result<StageReport, OrchestratorError> {
        let mut report = StageReport::default();

        // 1. Leftovers from earlier passes
        for id in self.store.list(PipelineLocation::Classifying)? {
            let Some(_lease) = self.leases.try_acquire(id) else {
                report.skipped += 1;
                continue;
            };
            self.classify_claimed(id, &mut report);
        }

        // 2. New arrivals
        for id in self.store.list(PipelineLocation::Inbox)? {
            let Some(_lease) = self.leases.try_acquire(id) else {
                report.skipped += 1;
                continue;
            };
            match self.store.relocate(
                id,
                PipelineLocation::Inbox,
                PipelineLocation::Classifying,
                "claimed",
            ) {
                Ok(()) => self.classify_claimed(id, &mut report),
                Err(StoreError::NotFound(_)) => {
                    debug!(id = %id, "Inbox artifact vanished before claim");
                }
                Err(e) => {
                    report.failed += 1;
                    self.record_failure(Stage::Classify, Some(id), &e);
                }
            }
        }

        Ok(report)
    }

    fn classify_claimed(&self, id: ArtifactId, report: &mut StageReport) {
        match self.try_classify(id) {
            Ok(Some(ClassificationOutcome::Classified(_))) => report.moved += 1,
            Ok(Some(ClassificationOutcome::Discarded(_))) => report.discarded += 1,
            Ok(None) => {}
            Err(e) => {
                report.failed += 1;
                self.record_failure(Stage::Classify, Some(id), &e);
            }
        }
    }

    fn try_classify(
        &self,
        id: ArtifactId,
    ) -> Result<Option<ClassificationOutcome>, OrchestratorError> {
        let Some(StoredArtifact {
            artifact,
            mut metadata,
            ..
        }) = self.store.load(id, PipelineLocation::Classifying)?
        else {
            return Ok(None);
        };

        let outcome = self.engine.classify_into(&artifact, &mut metadata)?;
        match &outcome {
            ClassificationOutcome::Discarded(DiscardReason::Noise { chars }) => {
                self.store.delete(id, PipelineLocation::Classifying)?;
                self.audit(
                    AuditLevel::Info,
                    "DISCARDED",
                    id,
                    format!("noise ({} chars)", chars),
                );
                Counters::bump(&self.counters.discarded, 1);
            }
            ClassificationOutcome::Classified(result) => {
                self.store
                    .save_metadata(&metadata, PipelineLocation::Classifying)?;
                self.store.relocate(
                    id,
                    PipelineLocation::Classifying,
                    PipelineLocation::Staged,
                    &format!("classified:{}", result.category),
                )?;
                let level = if result.safety_flag {
                    AuditLevel::Alert
                } else {
                    AuditLevel::Info
                };
                self.audit(
                    level,
                    "CLASSIFIED",
                    id,
                    format!("{}; {}", result.category, result.reasons.join("; ")),
                );
                Counters::bump(&self.counters.processed, 1);
            }
        }
        Ok(Some(outcome))
    }

    /// Move Staged artifacts to the router's destination
    pub fn route(&self) -> Result<StageReport, OrchestratorError> {
        let mut report = StageReport::default();

        for id in self.store.list(PipelineLocation::Staged)? {
            let Some(_lease) = self.leases.try_acquire(id) else {
                report.skipped += 1;
                continue;
            };
            match self.try_route(id) {
                Ok(true) => report.moved += 1,
                Ok(false) => {}
                Err(e) => {
                    report.failed += 1;
                    self.record_failure(Stage::Route, Some(id), &e);
                }
            }
        }

        Ok(report)
    }

    fn try_route(&self, id: ArtifactId) -> Result<bool, OrchestratorError> {
        let Some(stored) = self.store.load(id, PipelineLocation::Staged)? else {
            return Ok(false);
        };
        let Some(result) = stored.metadata.classification else {
            return Err(OrchestratorError::State(format!(
                "staged artifact {} has no classification",
                id
            )));
        };

        let destination = self.router.route_result(&result);
        self.store.relocate(
            id,
            PipelineLocation::Staged,
            destination,
            &format!("routed:{}", result.category),
        )?;

        let level = if result.safety_flag {
            AuditLevel::Alert
        } else {
            AuditLevel::Info
        };
        self.audit(
            level,
            "ROUTED",
            id,
            format!("{} -> {}", result.category, destination),
        );
        Counters::bump(&self.counters.routed, 1);
        Ok(true)
    }

    /// Issue the final ruling for placed artifacts that have none yet
    ///
    /// Each ruling is copied into the verdict ledger, recorded on the
    /// artifact's metadata and written to the audit log. The pipeline record
    /// stays where it is unless `enforce_verdicts` is set, in which case an
    /// artifact whose ruling names another placement is moved there first.
    pub fn adjudicate(&self) -> Result<AdjudicationReport, OrchestratorError> {
        let mut report = AdjudicationReport::default();

        // Listed up front so an artifact reassigned this pass is not visited twice
        let mut pending = Vec::new();
        for location in PipelineLocation::PLACED {
            for id in self.store.list(location)? {
                pending.push((id, location));
            }
        }

        for (id, location) in pending {
            let Some(_lease) = self.leases.try_acquire(id) else {
                report.skipped += 1;
                continue;
            };
            match self.try_adjudicate(id, location) {
                Ok(Some(reassigned)) => {
                    report.ruled += 1;
                    if reassigned {
                        report.reassigned += 1;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    report.failed += 1;
                    self.record_failure(Stage::Adjudicate, Some(id), &e);
                }
            }
        }

        Ok(report)
    }

    /// Adjudicate one artifact; `Some(reassigned)` once a ruling was recorded
    ///
    /// The ruling is saved last. Until then the artifact still needs
    /// adjudication, so a failure at any earlier step is redone in full on
    /// the next pass.
    fn try_adjudicate(
        &self,
        id: ArtifactId,
        location: PipelineLocation,
    ) -> Result<Option<bool>, OrchestratorError> {
        let Some(StoredArtifact {
            artifact, metadata, ..
        }) = self.store.load(id, location)?
        else {
            return Ok(None);
        };
        if !metadata.needs_adjudication() {
            return Ok(None);
        }
        let Some(classification) = metadata.classification.as_ref() else {
            return Ok(None);
        };

        let ruling = self.adjudicator.adjudicate(&artifact.content, classification);

        let destination = ruling.decision.destination();
        let reassigned = self.config.enforce_verdicts && destination != location;
        let (location, mut metadata) = if reassigned {
            self.store.reassign(
                id,
                location,
                destination,
                &format!("adjudicated:{}", ruling.decision),
            )?;
            let moved = self.store.load(id, destination)?.ok_or_else(|| {
                OrchestratorError::State(format!("{} vanished after reassignment", id))
            })?;
            (destination, moved.metadata)
        } else {
            (location, metadata)
        };

        metadata.adjudications.push(ruling.clone());
        self.store.copy_to_verdicts(&metadata, location, ruling.decision)?;
        self.store.save_metadata(&metadata, location)?;

        let (level, event) = audit_for(&ruling);
        self.audit(level, event, id, ruling.reasons.join("; "));

        info!(
            id = %id,
            decision = %ruling.decision,
            location = %location,
            covenant_score = ruling.covenant_score,
            danger = ruling.danger_detected,
            deception = ruling.deception_detected,
            "Adjudicated artifact"
        );
        Counters::bump(&self.counters.adjudicated, 1);
        Ok(Some(reassigned))
    }

    /// Run one janitor sweep
    pub fn sweep(&self) -> Result<JanitorMetrics, OrchestratorError> {
        let mut janitor = self.janitor.lock().unwrap_or_else(PoisonError::into_inner);
        let failures_before = janitor.metrics().failures;
        let metrics = janitor.sweep(&self.store)?;

        let new_failures = metrics.failures.saturating_sub(failures_before);
        Counters::bump(&self.counters.failures, new_failures as u64);
        Ok(metrics)
    }

    /// Report artifacts stuck in Inbox or Classifying
    pub fn health(&self) -> Result<Vec<StuckArtifact>, OrchestratorError> {
        self.health_at(current_timestamp())
    }

    /// Health check as if the clock read `now` (seconds since Unix epoch)
    pub fn health_at(&self, now: u64) -> Result<Vec<StuckArtifact>, OrchestratorError> {
        let thresholds = [
            (PipelineLocation::Inbox, self.config.stuck_inbox_secs),
            (
                PipelineLocation::Classifying,
                self.config.stuck_classifying_secs,
            ),
        ];

        let mut stuck = Vec::new();
        for (location, limit) in thresholds {
            for id in self.store.list(location)? {
                let Some(stored) = self.store.load(id, location)? else {
                    continue;
                };
                let age_secs = now.saturating_sub(stored.metadata.last_moved_at());
                if age_secs > limit {
                    warn!(id = %id, location = %location, age_secs, "Artifact appears stuck");
                    stuck.push(StuckArtifact {
                        id,
                        location,
                        age_secs,
                    });
                }
            }
        }

        if stuck.is_empty() {
            debug!("Health check passed");
        }
        Ok(stuck)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn deposit(&self, artifact: &Artifact) -> Result<ArtifactId, OrchestratorError> {
        let id = self.store.deposit(artifact)?;
        self.audit(AuditLevel::Info, "CAPTURED", id, artifact.source_kind.as_str());
        Counters::bump(&self.counters.captured, 1);
        Ok(id)
    }

    /// Append an audit line; a failing audit log is reported but never blocks a stage
    fn audit(&self, level: AuditLevel, event: &str, id: ArtifactId, detail: impl Into<String>) {
        let entry = AuditEntry::new(level, event, id, detail);
        if let Err(e) = self.store.append_audit(&entry) {
            warn!(id = %id, event, error = %e, "Failed to append audit line");
        }
    }

    fn record_failure(&self, stage: Stage, id: Option<ArtifactId>, err: &dyn Display) {
        match id {
            Some(id) => error!(stage = %stage, id = %id, error = %err, "Stage failed on artifact"),
            None => error!(stage = %stage, error = %err, "Stage pass failed"),
        }
        Counters::bump(&self.counters.failures, 1);

        let limit = self.config.recent_errors;
        if limit == 0 {
            return;
        }
        let mut recent = self
            .recent_errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        while recent.len() >= limit {
            recent.pop_front();
        }
        recent.push_back(StageFailure {
            stage,
            id,
            message: err.to_string(),
            at: current_timestamp(),
        });
    }
}

fn audit_for(ruling: &AdjudicationDecision) -> (AuditLevel, &'static str) {
    match ruling.decision {
        Decision::Quarantine if ruling.danger_detected => (AuditLevel::Alert, "QUARANTINED"),
        Decision::Quarantine => (AuditLevel::Warning, "QUARANTINED"),
        Decision::Accept => (AuditLevel::Info, "ACCEPTED"),
        Decision::Review => (AuditLevel::Info, "REVIEW"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn orchestrator(dir: &TempDir) -> Orchestrator {
        Orchestrator::new(OrchestratorConfig::at(dir.path())).unwrap()
    }

    #[test]
    fn test_start_stop() {
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(&dir);
        assert!(orch.is_running());

        orch.stop();
        assert!(!orch.is_running());
        assert!(!orch.status().unwrap().running);

        orch.start();
        assert!(orch.is_running());
    }

    #[test]
    fn test_start_paused() {
        let dir = TempDir::new().unwrap();
        let mut config = OrchestratorConfig::at(dir.path());
        config.pipeline.start_running = false;
        let orch = Orchestrator::new(config).unwrap();
        assert!(!orch.is_running());
    }

    #[test]
    fn test_cadence_per_stage() {
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(&dir);
        assert_eq!(orch.cadence(Stage::Route), Duration::from_millis(500));
        assert_eq!(orch.cadence(Stage::Janitor), Duration::from_millis(3_000));
        assert_eq!(orch.cadence(Stage::Health), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = OrchestratorConfig::at(dir.path());
        config.pipeline.classify_interval_ms = 0;
        assert!(matches!(
            Orchestrator::new(config),
            Err(OrchestratorError::Config(_))
        ));
    }

    #[test]
    fn test_recent_errors_are_bounded() {
        let dir = TempDir::new().unwrap();
        let mut config = OrchestratorConfig::at(dir.path());
        config.pipeline.recent_errors = 2;
        let orch = Orchestrator::new(config).unwrap();

        for n in 0..5 {
            orch.record_failure(Stage::Route, None, &format!("boom {}", n));
        }

        let status = orch.status().unwrap();
        assert_eq!(status.counters.failures, 5);
        assert_eq!(status.recent_errors.len(), 2);
        assert_eq!(status.recent_errors[0].message, "boom 3");
        assert_eq!(status.recent_errors[1].message, "boom 4");
    }

    #[test]
    fn test_audit_levels() {
        let ruling = |decision, danger| AdjudicationDecision {
            decision,
            covenant_score: 0,
            danger_detected: danger,
            deception_detected: false,
            reasons: Vec::new(),
        };
        assert_eq!(
            audit_for(&ruling(Decision::Quarantine, true)),
            (AuditLevel::Alert, "QUARANTINED")
        );
        assert_eq!(
            audit_for(&ruling(Decision::Quarantine, false)),
            (AuditLevel::Warning, "QUARANTINED")
        );
        assert_eq!(
            audit_for(&ruling(Decision::Accept, false)),
            (AuditLevel::Info, "ACCEPTED")
        );
    }

    #[test]
    fn test_status_serializes_location_keys() {
        let dir = TempDir::new().unwrap();
        let orch = orchestrator(&dir);
        let status = orch.status().unwrap();

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["counts"]["inbox"], 0);
        assert_eq!(json["counts"]["archived"], 0);

        let back: PipelineStatus = serde_json::from_value(json).unwrap();
        assert_eq!(back.counts.len(), PipelineLocation::ALL.len());
    }
}
