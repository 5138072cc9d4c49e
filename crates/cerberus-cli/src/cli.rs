//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cerberus CLI - Classify, adjudicate and route captured text.
#[derive(Debug, Parser)]
#[command(name = "cerberus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.cerberus/config.toml)
    #[arg(short, long, global = true, env = "CERBERUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of a running daemon's API (default: from the [api] section)
    #[arg(long, global = true, env = "CERBERUS_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the pipeline workers and the status API until Ctrl+C
    Run(RunArgs),

    /// Score and adjudicate text locally without touching the store
    Classify(TextArgs),

    /// Deposit text into the pipeline Inbox
    Submit(SubmitArgs),

    /// Show a running daemon's status
    Status,

    /// List artifacts at a pipeline location
    List(ListArgs),

    /// Show the tail of the audit log
    Logs(LogsArgs),

    /// Resume stage work on a running daemon
    Start,

    /// Pause stage work on a running daemon
    Stop,
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Store root (overrides [pipeline].root)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Do not serve the HTTP API
    #[arg(long)]
    pub no_api: bool,

    /// Start with stage work paused
    #[arg(long)]
    pub paused: bool,
}

/// Text given inline or read from a file.
#[derive(Debug, Parser)]
pub struct TextArgs {
    /// Text to process (reads stdin when neither text nor --file is given)
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Arguments for the submit command.
#[derive(Debug, Parser)]
pub struct SubmitArgs {
    /// Text to submit
    #[command(flatten)]
    pub input: TextArgs,

    /// Store root (overrides [pipeline].root)
    #[arg(short, long)]
    pub root: Option<PathBuf>,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Location (inbox, classifying, staged, accepted, quarantine, review, archived)
    pub location: String,
}

/// Arguments for the logs command.
#[derive(Debug, Parser)]
pub struct LogsArgs {
    /// Number of trailing lines
    #[arg(short = 'n', long, default_value = "20")]
    pub lines: usize,
}
