//! File storage API handlers
//!
//! Upload, retrieve, list and delete endpoints. Business logic lives in
//! [`FileService`](crate::services::files::FileService).

use crate::error::AppError;
use crate::state::SharedState;
use crate::store::FileSummary;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    response::{Json, Response},
};
use serde::Serialize;
use tracing::{debug, warn};

/// Multipart field carrying the uploaded file
pub const FILE_FIELD: &str = "file";

/// Response for a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Filename the content was stored under
    #[serde(rename = "Successfully uploaded")]
    pub filename: String,
}

/// Response for a successful delete
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Human-readable confirmation
    #[serde(rename = "Message")]
    pub message: String,
}

/// POST /upload - Store the multipart `file` part
pub async fn upload_file(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::InvalidUpload(e.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            warn!("Ignoring multipart field: {:?}", field.name());
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidUpload("file part has no filename".to_string()))?;
        let data = field.bytes().await.map_err(multipart_error)?;

        state.files.upload(&filename, &data).await?;
        return Ok(Json(UploadResponse { filename }));
    }

    Err(AppError::InvalidUpload(format!(
        "missing multipart field '{}'",
        FILE_FIELD
    )))
}

/// GET /retrieve/:filename - Download the first file stored under a name
pub async fn retrieve_file(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    debug!("Retrieving file: {}", filename);
    state.files.retrieve(&filename).await
}

/// GET /files - List stored files without their content
pub async fn list_files(
    State(state): State<SharedState>,
) -> Result<Json<Vec<FileSummary>>, AppError> {
    Ok(Json(state.files.list().await?))
}

/// DELETE /delete_file/:filename - Delete every file stored under a name
pub async fn delete_file(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.files.delete(&filename).await?;
    Ok(Json(DeleteResponse {
        message: format!("Deleted all occurrences of {}", filename),
    }))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidUpload(err.body_text())
    }
}
