//! HTTP listener configuration

use serde::{Deserialize, Serialize};

/// `[api]` section of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Serve the status API alongside the pipeline workers
    /// Default: true
    pub enabled: bool,

    /// Bind address
    /// Default: 127.0.0.1
    pub bind_address: String,

    /// Bind port
    /// Default: 8420
    pub bind_port: u16,

    /// Audit lines returned by `/logs` when `lines` is not given
    /// Default: 50
    pub default_log_lines: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8420,
            default_log_lines: 50,
        }
    }
}

impl ApiConfig {
    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Base URL clients use to reach this listener
    pub fn base_url(&self) -> String {
        format!("http://{}", self.bind_addr())
    }
}
