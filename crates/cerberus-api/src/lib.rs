//! Cerberus API
//!
//! HTTP status and control surface for a running pipeline.
//!
//! | method | path | |
//! |---|---|---|
//! | GET | `/health` | liveness and running flag |
//! | GET | `/status` | counts per location, counters, recent failures |
//! | GET | `/locations/{location}` | metadata of every artifact at a location |
//! | POST | `/start` | resume stage work |
//! | POST | `/stop` | pause stage work |
//! | GET | `/logs?lines=N` | audit log tail |

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use cerberus_orchestrator::{Orchestrator, OrchestratorError};
use config::ApiConfig;
use handlers::{create_router, AppState};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// API error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The path named a location that does not exist
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    /// The pipeline failed to answer
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Error body returned with every non-2xx response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnknownLocation(_) => StatusCode::NOT_FOUND,
            ApiError::Orchestrator(_) | ApiError::Bind(_) | ApiError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Serve the API until `shutdown` resolves
pub async fn start_server<F>(
    config: &ApiConfig,
    orchestrator: Arc<Orchestrator>,
    shutdown: F,
) -> Result<(), ApiError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let state = AppState {
        orchestrator,
        default_log_lines: config.default_log_lines,
    };
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("API listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ApiError::Server(e.to_string()))?;

    info!("API stopped");
    Ok(())
}
