use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use super::serialization::{deserialize, serialize};
use super::Result;

/// Trait for basic cache operations.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key.
    ///
    /// Expired entries are evicted and reported as missing.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache, overwriting any existing entry.
    ///
    /// When `ttl` is `None` the cache's default expiry applies.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes every key matching the regular expression `pattern`, or the
    /// whole cache when no pattern is given. Returns the number of entries removed.
    async fn invalidate(&self, pattern: Option<&str>) -> Result<usize>;
}

/// Typed JSON helpers available on every [`Cache`].
#[async_trait]
pub trait CacheExt: Cache {
    /// Gets and deserializes a JSON value.
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(bytes) => deserialize(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Serializes a value as JSON and stores it.
    async fn set_json<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let bytes = serialize(value)?;
        self.set(key, &bytes, ttl).await
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}
