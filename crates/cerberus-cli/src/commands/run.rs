//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use cerberus_orchestrator::{Orchestrator, WorkerSet};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinError;
use tracing::{error, info};

/// Execute the run command.
///
/// Spawns one worker per stage and, unless disabled, the status API, then
/// waits for Ctrl+C. Workers finish their current pass before exiting.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut pipeline = config.orchestrator(args.root);
    if args.paused {
        pipeline.pipeline.start_running = false;
    }

    let orchestrator = Arc::new(Orchestrator::new(pipeline)?);
    info!(root = %orchestrator.store().root().display(), "Starting Cerberus");

    let workers = WorkerSet::spawn(orchestrator.clone());

    let (stop_api, mut api_stopped) = watch::channel(false);
    let mut server = if config.api.enabled && !args.no_api {
        let api = config.api.clone();
        let orchestrator = orchestrator.clone();
        let shutdown = async move {
            let _ = api_stopped.changed().await;
        };
        Some(tokio::spawn(async move {
            cerberus_api::start_server(&api, orchestrator, shutdown).await
        }))
    } else {
        None
    };

    // Run until Ctrl+C, or until the API server exits on its own
    let mut server_exited = false;
    {
        let server_done = async {
            match server.as_mut() {
                Some(handle) => handle.await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Shutdown signal received");
            }
            result = server_done => {
                server_exited = true;
                report_server_exit(result);
            }
        }
    }

    let _ = stop_api.send(true);
    if let Some(handle) = server.take().filter(|_| !server_exited) {
        report_server_exit(handle.await);
    }
    workers.shutdown().await;

    let status = orchestrator.status()?;
    println!("{}", formatter.format_status(&status)?);
    Ok(())
}

fn report_server_exit(result: std::result::Result<std::result::Result<(), cerberus_api::ApiError>, JoinError>) {
    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "API server failed"),
        Err(e) => error!(error = %e, "API server task panicked"),
    }
}
