//! SQLite record store
//!
//! Handles all database interactions for stored files.

use super::{FileRecord, FileSummary, RecordStore, StoreError};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

const SCHEMA_SQL: &str = include_str!("../../migrations/001_create_files.sql");

/// Record store backed by a SQLite connection pool
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Open (creating if missing) the database and bootstrap the schema
    ///
    /// # Arguments
    /// * `database_url` - `sqlite:` URL or plain path to the database file
    /// * `max_connections` - Pool size
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let connection_string = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite:{}", database_url)
        };

        if let Some(parent) = file_path(&connection_string).and_then(|p| p.parent()) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Migration(format!("Failed to create db directory: {}", e))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&connection_string)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        info!("Connected to SQLite database at: {}", database_url);

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Apply the bundled schema (idempotent)
    async fn run_migrations(&self) -> Result<(), StoreError> {
        info!("Running database migrations...");

        for statement in split_statements(SCHEMA_SQL) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    StoreError::Migration(format!(
                        "{} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn create(&self, filename: &str, content: &[u8]) -> Result<i64, StoreError> {
        let result = sqlx::query("INSERT INTO files (filename, content) VALUES (?, ?)")
            .bind(filename)
            .bind(content)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        debug!(id, filename, bytes = content.len(), "Created file record");
        Ok(id)
    }

    async fn find_first_by_filename(&self, filename: &str) -> Result<FileRecord, StoreError> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT id, filename, content FROM files WHERE filename = ? ORDER BY id ASC LIMIT 1",
        )
        .bind(filename)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(filename.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<FileSummary>, StoreError> {
        let files =
            sqlx::query_as::<_, FileSummary>("SELECT id, filename FROM files ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(files)
    }

    async fn delete_all_by_filename(&self, filename: &str) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM files WHERE filename = ?")
            .bind(filename)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound(filename.to_string()));
        }

        tx.commit().await?;
        debug!(filename, deleted, "Deleted file records");
        Ok(deleted)
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

/// Filesystem path of a `sqlite:` URL, if it names a file
fn file_path(connection_string: &str) -> Option<&Path> {
    let rest = connection_string
        .strip_prefix("sqlite://")
        .or_else(|| connection_string.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(Path::new(path))
    }
}

/// Strip `--` comments and split a SQL script into statements
fn split_statements(sql: &str) -> Vec<String> {
    let mut cleaned = String::new();
    for line in sql.lines() {
        let code = match line.find("--") {
            Some(pos) => &line[..pos],
            None => line,
        };
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        cleaned.push_str(code);
        cleaned.push(' ');
    }

    cleaned
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
