//! Redis-backed blob store.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use crate::client::{validate_key, BlobStore, StorageResult};

/// Prefix applied to every key written by the client.
const KEY_PREFIX: &str = "continuum";

/// Blob store on a Redis server.
///
/// `ConnectionManager` multiplexes internally and is cheap to clone, so each
/// operation clones it to get a mutable handle.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to a Redis URL such as `redis://127.0.0.1:6379`.
    pub async fn connect(redis_url: &str) -> StorageResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        debug!(url = %redis_url, "RedisStore connected");
        Ok(Self { conn })
    }

    fn full_key(key: &str) -> StorageResult<String> {
        validate_key(key)?;
        Ok(format!("{}:{}", KEY_PREFIX, key))
    }
}

#[async_trait]
impl BlobStore for RedisStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(Self::full_key(key)?).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(Self::full_key(key)?, value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(Self::full_key(key)?).await?;
        Ok(())
    }
}
