//! Health check endpoint

use crate::error::AppError;
use crate::state::SharedState;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `healthy` when the store answered
    pub status: String,
    /// Crate version
    pub version: String,
    /// Number of stored files
    pub files: u64,
}

/// GET /health - Report service health and the stored file count
pub async fn health_check(
    State(state): State<SharedState>,
) -> Result<Json<HealthResponse>, AppError> {
    let files = state.files.count().await?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        files,
    }))
}
