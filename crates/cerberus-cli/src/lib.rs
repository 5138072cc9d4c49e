//! Cerberus CLI library.
//!
//! This library provides the core functionality for the `cerberus` command-line
//! interface: configuration loading, the daemon's API client, command
//! execution, and output formatting.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use client::ApiClient;
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
