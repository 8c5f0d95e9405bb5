//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Each variant maps to exactly one HTTP status through [`AppError::status_code`].
#[derive(Error, Debug)]
pub enum AppError {
    /// No record matches the requested filename
    #[error("File not found: {0}")]
    NotFound(String),

    /// The matched record has zero-length content
    #[error("File content is empty: {0}")]
    ContentEmpty(String),

    /// Storage backend failed (connection, query or transaction)
    #[error("Storage error: {0}")]
    Storage(StoreError),

    /// I/O failure while materializing a response
    #[error("Error processing file: {0}")]
    Processing(String),

    /// Upload request did not carry a usable file part
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// Upload body exceeded the configured limit
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status for this error kind
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ContentEmpty(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidUpload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(filename) => AppError::NotFound(filename),
            other => AppError::Storage(other),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Processing(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
