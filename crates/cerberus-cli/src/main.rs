//! Cerberus CLI - run the pipeline, classify text, and inspect a running daemon.

use anyhow::Context;
use cerberus_cli::commands;
use cerberus_cli::{ApiClient, Cli, Command, Config, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // The daemon logs at info; one-shot commands stay quiet unless RUST_LOG says otherwise
    let default_filter = match cli.command {
        Command::Run(_) => "info",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);
    let api_url = cli.api_url.unwrap_or_else(|| config.api.base_url());

    // Daemon commands talk to a running `cerberus run` over HTTP
    let client = ApiClient::new(&api_url);

    match cli.command {
        Command::Run(args) => commands::execute_run(args, &config, &formatter).await?,
        Command::Classify(args) => commands::execute_classify(args, &config, &formatter)?,
        Command::Submit(args) => commands::execute_submit(args, &config, &formatter)?,
        Command::Status => commands::execute_status(&client, &formatter).await?,
        Command::List(args) => commands::execute_list(args, &client, &formatter).await?,
        Command::Logs(args) => commands::execute_logs(args, &client, &formatter).await?,
        Command::Start => commands::execute_start(&client, &formatter).await?,
        Command::Stop => commands::execute_stop(&client, &formatter).await?,
    }

    Ok(())
}
