//! API module
//!
//! Contains HTTP request handlers and the router wiring them to paths.

pub mod files;
pub mod health;
pub mod middleware;

use crate::state::SharedState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Routes without middleware
pub fn router(state: SharedState) -> Router {
    let upload = post(files::upload_file).layer(DefaultBodyLimit::max(state.config.upload.max_bytes));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/upload", upload.clone())
        .route("/upload/", upload)
        .route("/retrieve/:filename", get(files::retrieve_file))
        .route("/files", get(files::list_files))
        .route("/files/", get(files::list_files))
        .route("/delete_file/:filename", delete(files::delete_file))
        .with_state(state)
}

/// Full application: routes plus request-id, tracing and CORS layers
pub fn app(state: SharedState) -> Router {
    router(state)
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
}
