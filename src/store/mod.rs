//! Record store
//!
//! Durable storage of [`FileRecord`]s behind the [`RecordStore`] trait.
//! Filenames are not unique: lookups may match zero, one or many records.

pub mod sqlite;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use thiserror::Error;

pub use sqlite::SqliteRecordStore;

/// A stored file
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FileRecord {
    /// Auto-assigned identity
    pub id: i64,
    /// Filename supplied at upload time
    pub filename: String,
    /// Raw content, possibly empty
    pub content: Vec<u8>,
}

/// Listing entry for a stored file (content excluded)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct FileSummary {
    /// Record identity
    pub id: i64,
    /// Record filename
    pub filename: String,
}

/// Errors raised by record store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record matches the filename
    #[error("File not found: {0}")]
    NotFound(String),

    /// Connection, query or transaction failure
    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    /// Schema bootstrap failed
    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Create/read/list/delete over file records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record and return its id
    async fn create(&self, filename: &str, content: &[u8]) -> Result<i64, StoreError>;

    /// Lowest-id record with the given filename
    async fn find_first_by_filename(&self, filename: &str) -> Result<FileRecord, StoreError>;

    /// All records as `(id, filename)` summaries, ascending by id
    async fn list_all(&self) -> Result<Vec<FileSummary>, StoreError>;

    /// Delete every record with the given filename in one transaction
    ///
    /// Returns the number of removed records. Fails with
    /// [`StoreError::NotFound`] (and removes nothing) when none match.
    async fn delete_all_by_filename(&self, filename: &str) -> Result<u64, StoreError>;

    /// Number of stored records
    async fn count_all(&self) -> Result<u64, StoreError>;
}
