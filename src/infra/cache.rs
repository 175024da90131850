//! Redis cache implementation.
//!
//! Thin type-safe layer over a pooled Redis connection, used to cache
//! offset pages of list queries. Entries are advisory: a miss or a cache
//! error just means the repository recomputes from the store.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{Config, CACHE_PREFIX_MEMBER_PAGE};
use crate::errors::{ApiResult, Failure};

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis cache connected");

        Ok(Self { connection })
    }

    /// Get a value from cache.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> ApiResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(cache_error)?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json).map_err(|e| {
                    Failure::internal(format!("Cache deserialization error: {e}"))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with a TTL (in seconds).
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> ApiResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| Failure::internal(format!("Cache serialization error: {e}")))?;

        conn.set_ex::<_, _, ()>(key, json, ttl_seconds)
            .await
            .map_err(cache_error)?;

        Ok(())
    }

    /// Check if a key exists in cache.
    pub async fn exists(&self, key: &str) -> ApiResult<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(key).await.map_err(cache_error)?;
        Ok(exists)
    }

    /// Delete all keys matching a pattern.
    /// Uses UNLINK for non-blocking async deletion in Redis.
    pub async fn delete_pattern(&self, pattern: &str) -> ApiResult<u64> {
        let mut conn = self.connection.clone();
        let keys: Vec<String> = conn.keys(pattern).await.map_err(cache_error)?;

        if keys.is_empty() {
            return Ok(0);
        }

        let count = keys.len() as u64;

        // UNLINK needs Redis 4.0+, fall back to DEL
        let deleted: i64 = redis::cmd("UNLINK")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .unwrap_or(0);

        if deleted == 0 {
            let _: i64 = conn.del(&keys).await.map_err(cache_error)?;
        }

        Ok(count)
    }
}

/// Cache key for one offset page of the member list.
///
/// Keyed by every pagination parameter: pages with different indexes or
/// sizes must never share an entry.
pub fn member_page_key(page_index: u64, page_size: u64) -> String {
    format!("{CACHE_PREFIX_MEMBER_PAGE}{page_index}:{page_size}")
}

/// Pattern matching every cached member page, for invalidation on writes.
pub fn member_page_pattern() -> String {
    format!("{CACHE_PREFIX_MEMBER_PAGE}*")
}

/// Convert Redis errors; callers treating the cache as advisory downgrade
/// these to misses.
fn cache_error(e: RedisError) -> Failure {
    tracing::error!("Redis error: {}", e);
    Failure::internal(format!("Cache error: {e}"))
}
