//! In-memory cache with per-entry expiry.
//!
//! Entries expire lazily: an expired entry is only noticed, and evicted,
//! when `get` is called after its expiry instant. There is no background
//! sweep and no size bound, so keys that are written but never read again
//! stay resident until an explicit invalidation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use regex::Regex;
use tokio::sync::RwLock;

use super::{Cache, CacheError, Result};

/// A single cache entry.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    stored_at: Instant,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Duration) -> Self {
        let stored_at = Instant::now();
        Self {
            value,
            stored_at,
            expires_at: stored_at + ttl,
        }
    }

    /// An entry is valid while `now < expires_at`.
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory cache with a default time-to-live.
///
/// Thread-safe through `Arc<RwLock<HashMap>>`; clones share the same store.
/// Construct one per process (or per scope) and pass it to whoever needs it.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<HashMap<String, CacheEntry>>>,
    default_ttl: Duration,
}

impl MemoryCache {
    /// Creates an empty cache whose entries live for `default_ttl` unless
    /// `set` is given an explicit duration.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        }
    }

    /// The expiry applied when `set` is called without a duration.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Number of entries currently held, including expired entries that
    /// have not been read since they expired.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true when the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Instant::now();
        let mut store = self.store.write().await;

        match store.get(key) {
            Some(entry) if entry.is_expired(now) => {
                store.remove(key);
                tracing::trace!(key, "Cache entry expired");
                Ok(None)
            }
            Some(entry) => {
                tracing::trace!(
                    key,
                    age_ms = now.duration_since(entry.stored_at).as_millis() as u64,
                    "Cache hit"
                );
                Ok(Some(entry.value.clone()))
            }
            None => {
                tracing::trace!(key, "Cache miss");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let entry = CacheEntry::new(value.to_vec(), ttl.unwrap_or(self.default_ttl));
        self.store.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn invalidate(&self, pattern: Option<&str>) -> Result<usize> {
        let mut store = self.store.write().await;

        let Some(pattern) = pattern else {
            let removed = store.len();
            store.clear();
            tracing::debug!(removed, "Cache cleared");
            return Ok(removed);
        };

        let re = Regex::new(pattern).map_err(|e| CacheError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let before = store.len();
        store.retain(|key, _| !re.is_match(key));
        let removed = before - store.len();

        tracing::debug!(pattern, removed, "Cache invalidated");
        Ok(removed)
    }
}
