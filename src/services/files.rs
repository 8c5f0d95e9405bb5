//! File storage service
//!
//! Upload, retrieval, listing and deletion of stored files on top of a
//! [`RecordStore`], with the empty-content policy applied on read.

use crate::config::{EmptyContentPolicy, RetrievalConfig};
use crate::error::AppError;
use crate::services::retrieval;
use crate::store::{FileRecord, FileSummary, RecordStore};
use axum::response::Response;
use std::sync::Arc;
use tracing::{info, warn};

/// File storage service
#[derive(Clone)]
pub struct FileService {
    store: Arc<dyn RecordStore>,
    retrieval: RetrievalConfig,
}

impl FileService {
    /// Create a service over a record store
    pub fn new(store: Arc<dyn RecordStore>, retrieval: RetrievalConfig) -> Self {
        Self { store, retrieval }
    }

    /// Store a new file and return its id
    ///
    /// Filenames and content are stored as given; an existing file with the
    /// same name is kept alongside the new one.
    pub async fn upload(&self, filename: &str, content: &[u8]) -> Result<i64, AppError> {
        let id = self.store.create(filename, content).await?;
        info!(id, filename, bytes = content.len(), "Stored file");
        Ok(id)
    }

    /// Look up the first record for a filename and apply the empty-content policy
    ///
    /// # Returns
    /// * `Ok(FileRecord)` - Lowest-id record with this filename
    /// * `Err(AppError::NotFound)` - No record matches
    /// * `Err(AppError::ContentEmpty)` - Content is empty and the policy rejects it
    pub async fn fetch(&self, filename: &str) -> Result<FileRecord, AppError> {
        let record = self.store.find_first_by_filename(filename).await?;

        if record.content.is_empty() && self.retrieval.empty_content == EmptyContentPolicy::Reject
        {
            warn!(id = record.id, filename, "Rejecting retrieval of empty file");
            return Err(AppError::ContentEmpty(record.filename));
        }

        Ok(record)
    }

    /// Fetch a file and build its download response
    pub async fn retrieve(&self, filename: &str) -> Result<Response, AppError> {
        let record = self.fetch(filename).await?;
        retrieval::build_download(record, &self.retrieval).await
    }

    /// Summaries of all stored files, ascending by id
    pub async fn list(&self) -> Result<Vec<FileSummary>, AppError> {
        Ok(self.store.list_all().await?)
    }

    /// Delete every file stored under a filename and return how many were removed
    pub async fn delete(&self, filename: &str) -> Result<u64, AppError> {
        let deleted = self.store.delete_all_by_filename(filename).await?;
        info!(filename, deleted, "Deleted files");
        Ok(deleted)
    }

    /// Number of stored files
    pub async fn count(&self) -> Result<u64, AppError> {
        Ok(self.store.count_all().await?)
    }
}
