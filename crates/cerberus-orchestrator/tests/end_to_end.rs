//! End-to-end pipeline tests over a temporary store

use cerberus_domain::traits::ArtifactStore;
use cerberus_domain::{
    current_timestamp, ArtifactId, Category, Decision, PipelineLocation, SourceKind,
};
use cerberus_orchestrator::{Orchestrator, OrchestratorConfig, Stage};
use std::fs;
use tempfile::TempDir;

/// Pipeline with healing switched off so placements stay observable
fn create_pipeline() -> (TempDir, Orchestrator) {
    let dir = TempDir::new().unwrap();
    let mut config = OrchestratorConfig::at(dir.path());
    config.janitor.heal = false;
    let orchestrator = Orchestrator::new(config).unwrap();
    (dir, orchestrator)
}

/// Like [`create_pipeline`], but rulings also move the pipeline record
fn create_enforcing_pipeline() -> (TempDir, Orchestrator) {
    let dir = TempDir::new().unwrap();
    let mut config = OrchestratorConfig::at(dir.path());
    config.janitor.heal = false;
    config.pipeline.enforce_verdicts = true;
    let orchestrator = Orchestrator::new(config).unwrap();
    (dir, orchestrator)
}

const LEAKED_FACT: &str = "source: confirmed, the data shows a verified result. password: hunter2";

fn verdict_path(orchestrator: &Orchestrator, decision: Decision, id: ArtifactId) -> std::path::PathBuf {
    orchestrator
        .store()
        .layout()
        .verdict_dir(decision)
        .join(id.to_string())
}

fn locations_of(orchestrator: &Orchestrator, id: ArtifactId) -> Vec<PipelineLocation> {
    PipelineLocation::ALL
        .into_iter()
        .filter(|location| orchestrator.store().load(id, *location).unwrap().is_some())
        .collect()
}

#[tokio::test]
async fn test_hostile_text_is_quarantined() {
    let (_dir, orchestrator) = create_pipeline();
    let id = orchestrator
        .submit("i hope you die", SourceKind::Manual)
        .unwrap();

    orchestrator.run_once().await;

    assert_eq!(locations_of(&orchestrator, id), vec![PipelineLocation::Quarantine]);
    let stored = orchestrator
        .store()
        .load(id, PipelineLocation::Quarantine)
        .unwrap()
        .unwrap();
    let classification = stored.metadata.classification.as_ref().unwrap();
    assert_eq!(classification.category, Category::LieHostile);
    assert!(classification.safety_flag);
    assert_eq!(
        stored.metadata.latest_adjudication().unwrap().decision,
        Decision::Quarantine
    );
}

#[tokio::test]
async fn test_factual_text_is_accepted() {
    let (_dir, orchestrator) = create_pipeline();
    let id = orchestrator
        .submit(
            "source: confirmed, the data shows a verified result",
            SourceKind::Manual,
        )
        .unwrap();

    let report = orchestrator.run_once().await;
    assert_eq!(report.classified.moved, 1);
    assert_eq!(report.routed.moved, 1);
    assert_eq!(report.adjudicated.ruled, 1);
    assert_eq!(report.adjudicated.reassigned, 0);

    assert_eq!(locations_of(&orchestrator, id), vec![PipelineLocation::Accepted]);
    let meta = &orchestrator.list_by_location(PipelineLocation::Accepted).unwrap()[0];
    assert_eq!(meta.classification.as_ref().unwrap().category, Category::Fact);
    let ruling = meta.latest_adjudication().unwrap();
    assert_eq!(ruling.decision, Decision::Accept);
    assert_eq!(ruling.reasons, vec!["Pure factual data".to_string()]);

    let reasons: Vec<&str> = meta.transitions.iter().map(|t| t.reason.as_str()).collect();
    assert_eq!(
        reasons,
        vec!["deposited", "claimed", "classified:FACT", "routed:FACT"]
    );

    let verdict = orchestrator
        .store()
        .layout()
        .verdict_dir(Decision::Accept)
        .join(id.to_string());
    assert!(verdict.join("content.txt").exists());
    assert!(verdict.join("meta.json").exists());
}

#[tokio::test]
async fn test_lie_with_covenant_is_ruled_review() {
    let (_dir, orchestrator) = create_pipeline();
    let plain = orchestrator
        .submit("trust me, i never said that but i did say it", SourceKind::Manual)
        .unwrap();
    let covenant = orchestrator
        .submit(
            "trust me, i never said that but i did say it, by the covenant",
            SourceKind::Manual,
        )
        .unwrap();

    orchestrator.run_once().await;

    // Both were routed to quarantine as LIE; the ruling is copied, not moved
    assert_eq!(locations_of(&orchestrator, plain), vec![PipelineLocation::Quarantine]);
    assert_eq!(locations_of(&orchestrator, covenant), vec![PipelineLocation::Quarantine]);
    assert!(verdict_path(&orchestrator, Decision::Review, covenant).exists());
    assert!(verdict_path(&orchestrator, Decision::Quarantine, plain).exists());

    let stored = orchestrator
        .store()
        .load(covenant, PipelineLocation::Quarantine)
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.metadata.classification.as_ref().unwrap().category,
        Category::Lie
    );
    let ruling = stored.metadata.latest_adjudication().unwrap();
    assert_eq!(ruling.decision, Decision::Review);
    assert!(ruling.deception_detected);
    assert_eq!(
        stored.metadata.transitions.last().unwrap().reason,
        "routed:LIE"
    );
}

#[tokio::test]
async fn test_enforced_ruling_moves_lie_with_covenant_to_review() {
    let (_dir, orchestrator) = create_enforcing_pipeline();
    let covenant = orchestrator
        .submit(
            "trust me, i never said that but i did say it, by the covenant",
            SourceKind::Manual,
        )
        .unwrap();

    let report = orchestrator.run_once().await;

    assert_eq!(report.adjudicated.ruled, 1);
    assert_eq!(report.adjudicated.reassigned, 1);
    assert_eq!(locations_of(&orchestrator, covenant), vec![PipelineLocation::Review]);
    let stored = orchestrator
        .store()
        .load(covenant, PipelineLocation::Review)
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.metadata.transitions.last().unwrap().reason,
        "adjudicated:REVIEW"
    );
    assert_eq!(
        stored.metadata.latest_adjudication().unwrap().decision,
        Decision::Review
    );
}

#[tokio::test]
async fn test_noise_is_discarded() {
    let (dir, orchestrator) = create_pipeline();
    let id = orchestrator.submit("x", SourceKind::Manual).unwrap();

    let report = orchestrator.run_once().await;

    assert_eq!(report.classified.discarded, 1);
    assert!(locations_of(&orchestrator, id).is_empty());
    assert!(!dir
        .path()
        .join("verdicts/accept")
        .join(id.to_string())
        .exists());

    let status = orchestrator.status().unwrap();
    assert_eq!(status.counters.discarded, 1);
    assert_eq!(status.counters.processed, 0);
    assert!(orchestrator
        .tail_audit(10)
        .unwrap()
        .iter()
        .any(|line| line.contains("DISCARDED") && line.contains(&id.to_string())));
}

#[tokio::test]
async fn test_danger_keyword_overrides_fact() {
    let (_dir, orchestrator) = create_enforcing_pipeline();
    let id = orchestrator.submit(LEAKED_FACT, SourceKind::Manual).unwrap();

    orchestrator.run_once().await;

    assert_eq!(locations_of(&orchestrator, id), vec![PipelineLocation::Quarantine]);
    let stored = orchestrator
        .store()
        .load(id, PipelineLocation::Quarantine)
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.metadata.classification.as_ref().unwrap().category,
        Category::Fact
    );
    let ruling = stored.metadata.latest_adjudication().unwrap();
    assert!(ruling.danger_detected);
    assert_eq!(ruling.reasons, vec!["DANGER: password".to_string()]);
    assert!(verdict_path(&orchestrator, Decision::Quarantine, id).exists());

    let audit = orchestrator.tail_audit(10).unwrap();
    assert!(audit
        .iter()
        .any(|line| line.contains("[ALERT] QUARANTINED:") && line.contains("DANGER: password")));
}

#[tokio::test]
async fn test_failed_verdict_copy_is_retried() {
    let (_dir, orchestrator) = create_pipeline();
    let id = orchestrator.submit(LEAKED_FACT, SourceKind::Manual).unwrap();
    orchestrator.classify().unwrap();
    orchestrator.route().unwrap();
    assert_eq!(locations_of(&orchestrator, id), vec![PipelineLocation::Accepted]);

    // A stray file where the verdict copy goes makes the copy fail
    let blocker = verdict_path(&orchestrator, Decision::Quarantine, id);
    fs::write(&blocker, "in the way").unwrap();

    let report = orchestrator.adjudicate().unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.ruled, 0);
    let stored = orchestrator
        .store()
        .load(id, PipelineLocation::Accepted)
        .unwrap()
        .unwrap();
    assert!(stored.metadata.needs_adjudication());

    fs::remove_file(&blocker).unwrap();
    let report = orchestrator.adjudicate().unwrap();
    assert_eq!(report.failed, 0);
    assert_eq!(report.ruled, 1);

    assert_eq!(locations_of(&orchestrator, id), vec![PipelineLocation::Accepted]);
    assert!(blocker.join("content.txt").exists());
    let stored = orchestrator
        .store()
        .load(id, PipelineLocation::Accepted)
        .unwrap()
        .unwrap();
    assert_eq!(stored.metadata.adjudications.len(), 1);
    assert_eq!(
        stored.metadata.latest_adjudication().unwrap().decision,
        Decision::Quarantine
    );

    // Ruled once, so later passes leave it alone
    assert_eq!(orchestrator.adjudicate().unwrap(), Default::default());
}

#[tokio::test]
async fn test_failed_verdict_copy_after_reassignment_is_retried() {
    let (_dir, orchestrator) = create_enforcing_pipeline();
    let id = orchestrator.submit(LEAKED_FACT, SourceKind::Manual).unwrap();
    orchestrator.classify().unwrap();
    orchestrator.route().unwrap();

    let blocker = verdict_path(&orchestrator, Decision::Quarantine, id);
    fs::write(&blocker, "in the way").unwrap();

    let report = orchestrator.adjudicate().unwrap();
    assert_eq!(report.failed, 1);
    // Moved, but not yet ruled
    assert_eq!(locations_of(&orchestrator, id), vec![PipelineLocation::Quarantine]);
    let stored = orchestrator
        .store()
        .load(id, PipelineLocation::Quarantine)
        .unwrap()
        .unwrap();
    assert!(stored.metadata.needs_adjudication());

    fs::remove_file(&blocker).unwrap();
    let report = orchestrator.adjudicate().unwrap();
    assert_eq!(report.ruled, 1);
    assert_eq!(report.reassigned, 0);

    let stored = orchestrator
        .store()
        .load(id, PipelineLocation::Quarantine)
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.metadata.latest_adjudication().unwrap().decision,
        Decision::Quarantine
    );
    let reasons: Vec<&str> = stored
        .metadata
        .transitions
        .iter()
        .map(|t| t.reason.as_str())
        .collect();
    assert_eq!(reasons.last(), Some(&"adjudicated:QUARANTINE"));
    assert!(blocker.join("meta.json").exists());
}

#[tokio::test]
async fn test_healing_promotes_adjudicated_quarantine() {
    let dir = TempDir::new().unwrap();
    let orchestrator = Orchestrator::new(OrchestratorConfig::at(dir.path())).unwrap();
    let id = orchestrator
        .submit("trust me, i never said that but i did say it", SourceKind::Manual)
        .unwrap();

    // Adjudicate runs before the janitor in a cycle
    let report = orchestrator.run_once().await;
    assert_eq!(report.janitor.healed, 1);

    assert_eq!(locations_of(&orchestrator, id), vec![PipelineLocation::Accepted]);
    let stored = orchestrator
        .store()
        .load(id, PipelineLocation::Accepted)
        .unwrap()
        .unwrap();
    assert_eq!(
        stored.metadata.latest_adjudication().unwrap().decision,
        Decision::Quarantine
    );
    assert_eq!(
        stored.metadata.transitions.last().unwrap().reason,
        "healed:always"
    );
}

#[tokio::test]
async fn test_accepted_artifacts_are_archived() {
    let dir = TempDir::new().unwrap();
    let mut config = OrchestratorConfig::at(dir.path());
    config.janitor.archive_after_secs = 0;
    let orchestrator = Orchestrator::new(config).unwrap();
    let id = orchestrator
        .submit(
            "source: confirmed, the data shows a verified result",
            SourceKind::Manual,
        )
        .unwrap();

    let report = orchestrator.run_once().await;

    assert_eq!(report.janitor.archived, 1);
    assert_eq!(locations_of(&orchestrator, id), vec![PipelineLocation::Archived]);
}

#[tokio::test]
async fn test_loose_inbox_files_are_adopted() {
    let (dir, orchestrator) = create_pipeline();
    fs::write(
        dir.path().join("inbox").join("clip-1.json"),
        r#"{"timestamp": 1700000000, "source": "clipboard", "content": "i hope you die"}"#,
    )
    .unwrap();
    fs::write(dir.path().join("inbox").join("garbage.json"), "not json").unwrap();

    let report = orchestrator.run_once().await;

    assert_eq!(report.captured.moved, 1);
    assert_eq!(report.captured.discarded, 1);
    let quarantined = orchestrator
        .list_by_location(PipelineLocation::Quarantine)
        .unwrap();
    assert_eq!(quarantined.len(), 1);
    assert_eq!(quarantined[0].source_kind, SourceKind::Clipboard);
    assert_eq!(quarantined[0].captured_at, 1_700_000_000);
}

#[tokio::test]
async fn test_drop_directory_collector() {
    let dir = TempDir::new().unwrap();
    let drops = TempDir::new().unwrap();
    let mut config = OrchestratorConfig::at(dir.path());
    config.pipeline.drop_dir = Some(drops.path().to_path_buf());
    let orchestrator = Orchestrator::new(config).unwrap();

    fs::write(drops.path().join("note.txt"), "the data shows a verified result").unwrap();
    let report = orchestrator.capture().await.unwrap();

    assert_eq!(report.moved, 1);
    assert_eq!(orchestrator.store().count(PipelineLocation::Inbox).unwrap(), 1);
    assert_eq!(orchestrator.status().unwrap().counters.captured, 1);
}

#[tokio::test]
async fn test_leased_artifact_is_skipped() {
    let (_dir, orchestrator) = create_pipeline();
    let id = orchestrator.submit("trust me", SourceKind::Manual).unwrap();

    let lease = orchestrator.leases().try_acquire(id).unwrap();
    let report = orchestrator.classify().unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(locations_of(&orchestrator, id), vec![PipelineLocation::Inbox]);

    drop(lease);
    let report = orchestrator.classify().unwrap();
    assert_eq!(report.moved, 1);
    assert_eq!(locations_of(&orchestrator, id), vec![PipelineLocation::Staged]);
}

#[tokio::test]
async fn test_leftover_classifying_artifact_is_retried() {
    let (_dir, orchestrator) = create_pipeline();
    let id = orchestrator.submit("trust me", SourceKind::Manual).unwrap();
    orchestrator
        .store()
        .relocate(
            id,
            PipelineLocation::Inbox,
            PipelineLocation::Classifying,
            "claimed",
        )
        .unwrap();

    let report = orchestrator.classify().unwrap();

    assert_eq!(report.moved, 1);
    assert_eq!(locations_of(&orchestrator, id), vec![PipelineLocation::Staged]);
}

#[tokio::test]
async fn test_health_reports_stuck_inbox() {
    let (_dir, orchestrator) = create_pipeline();
    let id = orchestrator.submit("trust me", SourceKind::Manual).unwrap();

    assert!(orchestrator.health().unwrap().is_empty());

    let stuck = orchestrator.health_at(current_timestamp() + 601).unwrap();
    assert_eq!(stuck.len(), 1);
    assert_eq!(stuck[0].id, id);
    assert_eq!(stuck[0].location, PipelineLocation::Inbox);
}

#[tokio::test]
async fn test_status_counts_and_stage_ticks() {
    let (_dir, orchestrator) = create_pipeline();
    orchestrator.submit("i hope you die", SourceKind::Manual).unwrap();
    orchestrator
        .submit(
            "source: confirmed, the data shows a verified result",
            SourceKind::Manual,
        )
        .unwrap();

    for stage in Stage::ALL {
        orchestrator.tick(stage).await;
    }

    let status = orchestrator.status().unwrap();
    assert!(status.running);
    assert_eq!(status.counts[&PipelineLocation::Accepted], 1);
    assert_eq!(status.counts[&PipelineLocation::Quarantine], 1);
    assert_eq!(status.counts[&PipelineLocation::Inbox], 0);
    assert_eq!(status.counters.captured, 2);
    assert_eq!(status.counters.processed, 2);
    assert_eq!(status.counters.routed, 2);
    assert_eq!(status.counters.adjudicated, 2);
    assert_eq!(status.counters.failures, 0);
    assert!(status.recent_errors.is_empty());
}

#[tokio::test]
async fn test_verdict_is_copied_not_moved_by_default() {
    let dir = TempDir::new().unwrap();
    let mut config = OrchestratorConfig::at(dir.path());
    config.janitor.heal = false;
    let orchestrator = Orchestrator::new(config).unwrap();
    let id = orchestrator.submit(LEAKED_FACT, SourceKind::Manual).unwrap();

    let report = orchestrator.run_once().await;
    assert_eq!(report.adjudicated.reassigned, 0);

    // Ruled QUARANTINE, but the record stays queryable where the router put it
    assert_eq!(locations_of(&orchestrator, id), vec![PipelineLocation::Accepted]);
    let listed = orchestrator
        .list_by_location(PipelineLocation::Accepted)
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(
        listed[0].latest_adjudication().unwrap().decision,
        Decision::Quarantine
    );
    assert!(verdict_path(&orchestrator, Decision::Quarantine, id)
        .join("content.txt")
        .exists());
}
