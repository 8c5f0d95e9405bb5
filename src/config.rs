//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Default request body limit for uploads (16 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Default chunk size for streamed download bodies (64 KiB)
pub const DEFAULT_STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Storage configuration
    pub storage: StorageConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Upload configuration
    pub upload: UploadConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// SQLite URL (`sqlite:path`) or plain path to the database file
    pub database_url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

/// How stored content is turned into a download body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrievalStrategy {
    /// Wrap the in-memory content in a chunked stream
    #[default]
    Stream,
    /// Spill content to an anonymous temp file and stream it from disk
    TempFile,
}

impl FromStr for RetrievalStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stream" => Ok(RetrievalStrategy::Stream),
            "temp-file" | "temp_file" | "tempfile" => Ok(RetrievalStrategy::TempFile),
            other => Err(format!("unknown retrieval strategy: {}", other)),
        }
    }
}

/// What to do when a retrieved record has zero-length content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyContentPolicy {
    /// Fail the retrieval with `ContentEmpty`
    #[default]
    Reject,
    /// Return a zero-length body
    Allow,
}

impl FromStr for EmptyContentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(EmptyContentPolicy::Reject),
            "allow" => Ok(EmptyContentPolicy::Allow),
            other => Err(format!("unknown empty content policy: {}", other)),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Strategy used to build download bodies
    pub strategy: RetrievalStrategy,
    /// Policy for records with empty content
    pub empty_content: EmptyContentPolicy,
    /// Directory holding temp files for [`RetrievalStrategy::TempFile`]
    pub temp_dir: PathBuf,
    /// Chunk size for streamed bodies
    pub chunk_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            strategy: RetrievalStrategy::default(),
            empty_content: EmptyContentPolicy::default(),
            temp_dir: env::temp_dir(),
            chunk_size: DEFAULT_STREAM_CHUNK_SIZE,
        }
    }
}

/// Upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Request body limit in bytes
    pub max_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RetrievalConfig::default();

        Self {
            server: ServerConfig {
                port: parse_or(&lookup, "PORT", 8000),
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            },
            storage: StorageConfig {
                database_url: lookup("DATABASE_URL")
                    .unwrap_or_else(|| "sqlite:file_store.db".to_string()),
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5),
            },
            retrieval: RetrievalConfig {
                strategy: parse_or(&lookup, "RETRIEVAL_STRATEGY", defaults.strategy),
                empty_content: parse_or(&lookup, "EMPTY_CONTENT_POLICY", defaults.empty_content),
                temp_dir: lookup("TEMP_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.temp_dir),
                chunk_size: parse_or(&lookup, "STREAM_CHUNK_SIZE", defaults.chunk_size).max(1),
            },
            upload: UploadConfig {
                max_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid value for {}: {:?}", key, raw);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server_addr(), "0.0.0.0:8000");
        assert_eq!(config.storage.database_url, "sqlite:file_store.db");
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.retrieval.strategy, RetrievalStrategy::Stream);
        assert_eq!(config.retrieval.empty_content, EmptyContentPolicy::Reject);
        assert_eq!(config.retrieval.chunk_size, DEFAULT_STREAM_CHUNK_SIZE);
        assert_eq!(config.upload.max_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9001"),
            ("DATABASE_URL", "sqlite:/tmp/files.db"),
            ("RETRIEVAL_STRATEGY", "temp-file"),
            ("EMPTY_CONTENT_POLICY", "allow"),
            ("TEMP_DIR", "/var/tmp"),
            ("STREAM_CHUNK_SIZE", "1024"),
        ]));
        assert_eq!(config.server_addr(), "127.0.0.1:9001");
        assert_eq!(config.storage.database_url, "sqlite:/tmp/files.db");
        assert_eq!(config.retrieval.strategy, RetrievalStrategy::TempFile);
        assert_eq!(config.retrieval.empty_content, EmptyContentPolicy::Allow);
        assert_eq!(config.retrieval.temp_dir, PathBuf::from("/var/tmp"));
        assert_eq!(config.retrieval.chunk_size, 1024);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("RETRIEVAL_STRATEGY", "carrier-pigeon"),
            ("STREAM_CHUNK_SIZE", "0"),
        ]));
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.retrieval.strategy, RetrievalStrategy::Stream);
        // zero would never make progress
        assert_eq!(config.retrieval.chunk_size, 1);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        env::set_var("EMPTY_CONTENT_POLICY", "Allow");
        let config = Config::from_env();
        env::remove_var("EMPTY_CONTENT_POLICY");
        assert_eq!(config.retrieval.empty_content, EmptyContentPolicy::Allow);
    }
}
