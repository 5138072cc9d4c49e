//! HTTP client for a running daemon's status API.

use crate::error::{CliError, Result};
use cerberus_api::handlers::{ControlResponse, HealthResponse, LocationResponse, LogsResponse};
use cerberus_domain::PipelineLocation;
use cerberus_orchestrator::PipelineStatus;
use serde::de::DeserializeOwned;

/// Client for the endpoints served by `cerberus run`
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:8420`)
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Base URL requests go to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthResponse> {
        self.get("/health").await
    }

    /// GET /status
    pub async fn status(&self) -> Result<PipelineStatus> {
        self.get("/status").await
    }

    /// GET /locations/{location}
    pub async fn list(&self, location: PipelineLocation) -> Result<LocationResponse> {
        self.get(&format!("/locations/{}", location)).await
    }

    /// GET /logs?lines=N
    pub async fn logs(&self, lines: usize) -> Result<LogsResponse> {
        self.get(&format!("/logs?lines={}", lines)).await
    }

    /// POST /start
    pub async fn start(&self) -> Result<ControlResponse> {
        self.post("/start").await
    }

    /// POST /stop
    pub async fn stop(&self) -> Result<ControlResponse> {
        self.post("/stop").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http.get(self.url(path));
        self.send(request).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let request = self.http.post(self.url(path));
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            CliError::Connection(format!(
                "could not reach {} ({}). Is `cerberus run` running?",
                self.base_url, e
            ))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CliError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| CliError::Api(format!("invalid response: {}", e)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
