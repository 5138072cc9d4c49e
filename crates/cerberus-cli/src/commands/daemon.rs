//! Commands that talk to a running daemon over HTTP.

use crate::cli::{ListArgs, LogsArgs};
use crate::client::ApiClient;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use cerberus_domain::PipelineLocation;

/// Execute the status command.
pub async fn execute_status(client: &ApiClient, formatter: &Formatter) -> Result<()> {
    let status = client.status().await?;
    println!("{}", formatter.format_status(&status)?);
    Ok(())
}

/// Execute the list command.
pub async fn execute_list(args: ListArgs, client: &ApiClient, formatter: &Formatter) -> Result<()> {
    let location = PipelineLocation::parse(&args.location).ok_or_else(|| {
        CliError::InvalidInput(format!("unknown location '{}'", args.location))
    })?;

    let listing = client.list(location).await?;
    println!("{}", formatter.format_artifacts(location, &listing.artifacts)?);
    Ok(())
}

/// Execute the logs command.
pub async fn execute_logs(args: LogsArgs, client: &ApiClient, formatter: &Formatter) -> Result<()> {
    let logs = client.logs(args.lines).await?;
    println!("{}", formatter.format_logs(&logs.lines)?);
    Ok(())
}

/// Execute the start command.
pub async fn execute_start(client: &ApiClient, formatter: &Formatter) -> Result<()> {
    client.start().await?;
    println!("{}", formatter.success("Pipeline running"));
    Ok(())
}

/// Execute the stop command.
pub async fn execute_stop(client: &ApiClient, formatter: &Formatter) -> Result<()> {
    client.stop().await?;
    println!("{}", formatter.success("Pipeline paused"));
    Ok(())
}
