//! Background workers: one polling loop per stage

use crate::{Orchestrator, Stage};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// The running set of stage workers
///
/// Each stage ticks on its own cadence. The running flag is checked once per
/// tick, so [`Orchestrator::stop`] idles the workers without tearing them
/// down; [`WorkerSet::shutdown`] ends them.
///
/// # Examples
///
/// ```no_run
/// use cerberus_orchestrator::{Orchestrator, OrchestratorConfig, WorkerSet};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let orchestrator = Arc::new(Orchestrator::new(OrchestratorConfig::default())?);
///     let workers = WorkerSet::spawn(orchestrator);
///
///     tokio::signal::ctrl_c().await?;
///     workers.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct WorkerSet {
    shutdown: watch::Sender<bool>,
    handles: Vec<(Stage, JoinHandle<()>)>,
}

impl WorkerSet {
    /// Spawn a worker for every stage
    pub fn spawn(orchestrator: Arc<Orchestrator>) -> Self {
        let (shutdown, receiver) = watch::channel(false);
        let handles = Stage::ALL
            .into_iter()
            .map(|stage| {
                let worker = run_stage(orchestrator.clone(), stage, receiver.clone());
                (stage, tokio::spawn(worker))
            })
            .collect();

        Self { shutdown, handles }
    }

    /// Number of live workers
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no workers were spawned
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Signal every worker and wait for it to finish its current pass
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for (stage, handle) in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(stage = %stage, error = %e, "Stage worker panicked");
            }
        }
        tracing::info!("All stage workers stopped");
    }
}

async fn run_stage(orchestrator: Arc<Orchestrator>, stage: Stage, mut shutdown: watch::Receiver<bool>) {
    let period = orchestrator.cadence(stage);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(stage = %stage, interval = ?period, "Stage worker started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if orchestrator.is_running() {
                    orchestrator.tick(stage).await;
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::debug!(stage = %stage, "Stage worker exiting");
}
