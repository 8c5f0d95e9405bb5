// Application state
// Built once at startup and injected into handlers through axum's `State`

use crate::config::Config;
use crate::services::files::FileService;
use crate::store::{RecordStore, SqliteRecordStore};
use std::sync::Arc;

/// Shared handle to the application state
pub type SharedState = Arc<AppState>;

/// Process-wide application state
///
/// Holds no mutable data: the record store owns its connection pool and
/// provides its own transaction isolation.
#[derive(Clone)]
pub struct AppState {
    /// File storage service
    pub files: FileService,
    /// Loaded configuration
    pub config: Config,
}

impl AppState {
    /// Create state over an existing record store
    pub fn new(store: Arc<dyn RecordStore>, config: Config) -> Self {
        Self {
            files: FileService::new(store, config.retrieval.clone()),
            config,
        }
    }

    /// Connect the SQLite store named by `config` and build the state
    pub async fn connect(config: Config) -> anyhow::Result<Self> {
        let store = SqliteRecordStore::connect(
            &config.storage.database_url,
            config.storage.max_connections,
        )
        .await?;
        Ok(Self::new(Arc::new(store), config))
    }

    /// Wrap the state for sharing across handlers
    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
