//! Blob store trait, error types and backend selection.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{FileStore, MemoryStore, RedisStore};

/// Storage error types.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Redis connection error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value string storage scoped to one client.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the value under `key`, `None` when nothing is stored.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Where the blob store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// Process memory only; nothing survives a restart.
    Memory,
    /// One file per key under a directory.
    Directory(PathBuf),
    /// A Redis server, e.g. `redis://127.0.0.1:6379`.
    Redis(String),
}

impl StorageLocation {
    /// Parse `memory`, a `redis://`/`rediss://` URL, or a directory path.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("memory") {
            Self::Memory
        } else if trimmed.starts_with("redis://") || trimmed.starts_with("rediss://") {
            Self::Redis(trimmed.to_string())
        } else {
            Self::Directory(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Directory(path) => write!(f, "{}", path.display()),
            Self::Redis(url) => write!(f, "{}", url),
        }
    }
}

/// Open the backend for a location.
pub async fn open(location: &StorageLocation) -> StorageResult<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match location {
        StorageLocation::Memory => Arc::new(MemoryStore::new()),
        StorageLocation::Directory(dir) => Arc::new(FileStore::open(dir).await?),
        StorageLocation::Redis(url) => Arc::new(RedisStore::connect(url).await?),
    };
    Ok(store)
}

/// Reject keys that cannot be used as a file name or Redis key suffix.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
