//! Cerberus Orchestrator
//!
//! Drives the classification and adjudication pipeline over an artifact store.
//!
//! # Stages
//!
//! | stage | default cadence | work |
//! |---|---|---|
//! | capture | 2 s | poll collectors, adopt loose Inbox files |
//! | classify | 1 s | Inbox → Classifying → Staged, or discard noise |
//! | route | 0.5 s | Staged → Accepted / Quarantine / Review |
//! | adjudicate | 0.7 s | final ruling, verdict copy, audit (re-placement only with `enforce_verdicts`) |
//! | janitor | 3 s | healing, archiving, retention |
//! | health | 10 s | stuck artifact report |
//!
//! Every stage is a method on [`Orchestrator`], so a single pass can be run
//! by hand ([`Orchestrator::run_once`]) or on a schedule ([`WorkerSet`]).
//!
//! # Usage
//!
//! ```no_run
//! use cerberus_orchestrator::{Orchestrator, OrchestratorConfig, WorkerSet};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OrchestratorConfig::at("/var/lib/cerberus");
//! let orchestrator = Arc::new(Orchestrator::new(config)?);
//! let workers = WorkerSet::spawn(orchestrator.clone());
//!
//! orchestrator.stop();   // pause
//! orchestrator.start();  // resume
//!
//! workers.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod capture;
mod config;
mod error;
mod orchestrator;
mod worker;

pub use config::{OrchestratorConfig, PipelineConfig};
pub use error::OrchestratorError;
pub use orchestrator::{
    AdjudicationReport, CycleReport, Orchestrator, PipelineCounters, PipelineStatus, Stage,
    StageFailure, StageReport, StuckArtifact,
};
pub use worker::WorkerSet;
