//! HTTP request handlers for the status and control surface.

use crate::ApiError;
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use cerberus_domain::{ArtifactMetadata, PipelineLocation};
use cerberus_orchestrator::{Orchestrator, PipelineStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The pipeline being served
    pub orchestrator: Arc<Orchestrator>,
    /// Lines returned by `/logs` without a `lines` parameter
    pub default_log_lines: usize,
}

impl AppState {
    /// State with the default `/logs` page size
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            default_log_lines: 50,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" while running, "paused" after `/stop`
    pub status: String,
    /// Whether stage workers are doing work
    pub running: bool,
    /// Crate version
    pub version: String,
}

/// Artifacts at one location
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    /// Location queried
    pub location: PipelineLocation,
    /// Number of artifacts
    pub count: usize,
    /// Their metadata records, oldest first
    pub artifacts: Vec<ArtifactMetadata>,
}

/// Response to `/start` and `/stop`
#[derive(Debug, Serialize, Deserialize)]
pub struct ControlResponse {
    /// Running flag after the call
    pub running: bool,
}

/// Query parameters for `/logs`
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    /// Number of trailing audit lines
    pub lines: Option<usize>,
}

/// Audit log tail
#[derive(Debug, Serialize, Deserialize)]
pub struct LogsResponse {
    /// Lines, oldest first
    pub lines: Vec<String>,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let running = state.orchestrator.is_running();
    Json(HealthResponse {
        status: if running { "healthy" } else { "paused" }.to_string(),
        running,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /status
async fn status(State(state): State<AppState>) -> Result<Json<PipelineStatus>, ApiError> {
    Ok(Json(state.orchestrator.status()?))
}

/// GET /locations/:location
async fn list_location(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<LocationResponse>, ApiError> {
    let location =
        PipelineLocation::parse(&location).ok_or(ApiError::UnknownLocation(location))?;
    let artifacts = state.orchestrator.list_by_location(location)?;

    Ok(Json(LocationResponse {
        location,
        count: artifacts.len(),
        artifacts,
    }))
}

/// POST /start
async fn start(State(state): State<AppState>) -> Json<ControlResponse> {
    state.orchestrator.start();
    Json(ControlResponse {
        running: state.orchestrator.is_running(),
    })
}

/// POST /stop
async fn stop(State(state): State<AppState>) -> Json<ControlResponse> {
    state.orchestrator.stop();
    Json(ControlResponse {
        running: state.orchestrator.is_running(),
    })
}

/// GET /logs?lines=N
async fn logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, ApiError> {
    let n = query.lines.unwrap_or(state.default_log_lines);
    Ok(Json(LogsResponse {
        lines: state.orchestrator.tail_audit(n)?,
    }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/locations/:location", get(list_location))
        .route("/start", post(start))
        .route("/stop", post(stop))
        .route("/logs", get(logs))
        .with_state(state)
}
