//! Cached repository decorators.
//!
//! This module provides decorator implementations that wrap repository traits
//! with caching behavior. The decorators implement the cache-aside pattern:
//!
//! - **Reads**: Check cache first, on miss fetch from repository and populate cache
//! - **Writes**: Persist to repository, then drop the collection key and the
//!   item key before returning
//!
//! Each decorator keeps a [`Generation`] so a miss that raced a write never
//! stores the value it read before that write committed.
//!
//! Cache failures are logged and never fail the repository call.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let repo = Arc::new(InMemoryRepository::new());
//! let cache = Arc::new(MemoryCache::new(Duration::from_secs(30)));
//!
//! let students = CachedStudentRepository::new(repo, cache);
//! ```

mod settings;
mod song;
mod student;

pub use settings::CachedSettingsRepository;
pub use song::CachedSongRepository;
pub use student::CachedStudentRepository;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{Mutex, MutexGuard};

use lessonbook_core::cache::{Cache, CacheExt};

/// Write counter of one decorator.
///
/// Misses record the generation before reading the store and populate only if
/// it is unchanged. Writes bump it and invalidate while holding the same lock,
/// so a stale populate is either skipped or removed by the invalidation.
#[derive(Debug, Default)]
struct Generation(Mutex<u64>);

impl Generation {
    async fn current(&self) -> u64 {
        *self.0.lock().await
    }

    /// Populates `key` unless a write committed since `seen` was taken.
    async fn populate<T, C>(&self, seen: u64, cache: &C, key: &str, value: &T)
    where
        T: Serialize + Sync,
        C: Cache + ?Sized,
    {
        let generation = self.0.lock().await;
        if *generation == seen {
            populate(cache, key, value).await;
        } else {
            tracing::trace!(key, "Skipping populate after concurrent write");
        }
    }

    /// Bumps the generation. Hold the guard until invalidation is done.
    async fn advance(&self) -> MutexGuard<'_, u64> {
        let mut generation = self.0.lock().await;
        *generation += 1;
        generation
    }
}

/// Reads a cached JSON value, treating any cache failure as a miss.
async fn cached<T, C>(cache: &C, key: &str) -> Option<T>
where
    T: DeserializeOwned + Send,
    C: Cache + ?Sized,
{
    match cache.get_json(key).await {
        Ok(Some(value)) => {
            tracing::trace!(key, "Cache hit");
            Some(value)
        }
        Ok(None) => {
            tracing::trace!(key, "Cache miss");
            None
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "Cache read failed");
            None
        }
    }
}

/// Stores a JSON value with the cache's default expiry.
async fn populate<T, C>(cache: &C, key: &str, value: &T)
where
    T: Serialize + Sync,
    C: Cache + ?Sized,
{
    if let Err(err) = cache.set_json(key, value, None).await {
        tracing::warn!(key, error = %err, "Failed to populate cache");
    }
}

/// Drops every listed key.
async fn invalidate<C>(cache: &C, keys: &[String])
where
    C: Cache + ?Sized,
{
    for key in keys {
        if let Err(err) = cache.delete(key).await {
            tracing::warn!(key = %key, error = %err, "Failed to invalidate cache key");
        }
    }
}

/// Drops every key matching `pattern`.
async fn invalidate_pattern<C>(cache: &C, pattern: &str)
where
    C: Cache + ?Sized,
{
    match cache.invalidate(Some(pattern)).await {
        Ok(removed) => tracing::trace!(pattern, removed, "Cache pattern invalidated"),
        Err(err) => tracing::warn!(pattern, error = %err, "Failed to invalidate cache pattern"),
    }
}
