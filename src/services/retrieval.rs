//! Download response building
//!
//! Turns a retrieved [`FileRecord`] into an `application/octet-stream`
//! attachment. The body is produced by one of two strategies:
//!
//! - [`RetrievalStrategy::Stream`]: the in-memory content is sliced into
//!   chunks and streamed directly.
//! - [`RetrievalStrategy::TempFile`]: the content is spilled to an anonymous
//!   temp file and streamed back from disk. The file has no name on disk, so
//!   it is reclaimed by the OS whether the response completes, fails or is
//!   dropped early.

use crate::config::{RetrievalConfig, RetrievalStrategy};
use crate::error::AppError;
use crate::store::FileRecord;
use async_stream::stream;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use futures_util::stream as futures_stream;
use std::io::SeekFrom;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::debug;

/// Media type of every download
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Build the download response for a record
///
/// # Arguments
/// * `record` - Record whose content becomes the body
/// * `config` - Retrieval settings (strategy, temp dir, chunk size)
///
/// # Returns
/// * `Ok(Response)` - 200 response with disposition and media type headers
/// * `Err(AppError::Processing)` - Header or temp-file I/O failure
pub async fn build_download(
    record: FileRecord,
    config: &RetrievalConfig,
) -> Result<Response, AppError> {
    let disposition = content_disposition(&record.filename)?;
    let length = record.content.len();

    let body = match config.strategy {
        RetrievalStrategy::Stream => memory_body(record.content, config.chunk_size),
        RetrievalStrategy::TempFile => {
            temp_file_body(&record.content, &config.temp_dir, config.chunk_size).await?
        }
    };

    debug!(
        id = record.id,
        filename = %record.filename,
        bytes = length,
        strategy = ?config.strategy,
        "Built download response"
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, OCTET_STREAM)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, length)
        .body(body)
        .map_err(|e| AppError::Processing(format!("Failed to build response: {}", e)))
}

/// `Content-Disposition` value marking the body as an attachment
///
/// Non-ASCII names also get an RFC 5987 `filename*` parameter, with `_`
/// standing in for each non-ASCII character in the plain `filename`.
pub fn content_disposition(filename: &str) -> Result<HeaderValue, AppError> {
    let quoted = filename.replace('\\', "\\\\").replace('"', "\\\"");

    let value = if filename.is_ascii() {
        format!("attachment; filename=\"{}\"", quoted)
    } else {
        let fallback: String = quoted
            .chars()
            .map(|c| if c.is_ascii() { c } else { '_' })
            .collect();
        format!(
            "attachment; filename=\"{}\"; filename*=utf-8''{}",
            fallback,
            urlencoding::encode(filename)
        )
    };

    HeaderValue::from_str(&value)
        .map_err(|e| AppError::Processing(format!("Invalid filename for header: {}", e)))
}

fn memory_body(content: Vec<u8>, chunk_size: usize) -> Body {
    let content = Bytes::from(content);
    let chunk_size = chunk_size.max(1);

    let chunks: Vec<Result<Bytes, std::io::Error>> = (0..content.len())
        .step_by(chunk_size)
        .map(|start| {
            let end = (start + chunk_size).min(content.len());
            Ok(content.slice(start..end))
        })
        .collect();

    Body::from_stream(futures_stream::iter(chunks))
}

async fn temp_file_body(content: &[u8], dir: &Path, chunk_size: usize) -> Result<Body, AppError> {
    let spill = tempfile::tempfile_in(dir)?;
    let mut file = tokio::fs::File::from_std(spill);

    file.write_all(content).await?;
    file.flush().await?;
    file.seek(SeekFrom::Start(0)).await?;

    let mut buf = vec![0u8; chunk_size.max(1)];
    let body_stream = stream! {
        loop {
            match file.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => yield Ok(Bytes::copy_from_slice(&buf[..n])),
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    };

    Ok(Body::from_stream(body_stream))
}
