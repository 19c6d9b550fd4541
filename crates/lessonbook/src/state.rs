//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It holds repository trait objects so the handlers never
//! see which backend is compiled in.

use std::{sync::Arc, time::Duration};

use lessonbook_core::storage::{
    SettingsRepository, SongRepository, StudentRepository, TeachingRepository,
};

use crate::config::Config;

/// Shared application state.
///
/// Cloned for each request handler. Students, songs and settings go through
/// the cache-aside decorators; teaching records are read uncached.
#[derive(Clone)]
pub struct AppState {
    /// Student repository (cached, wraps underlying storage).
    pub students: Arc<dyn StudentRepository>,
    /// Song repository (cached, wraps underlying storage).
    pub songs: Arc<dyn SongRepository>,
    /// Teaching record repository.
    pub teachings: Arc<dyn TeachingRepository>,
    /// Settings repository (cached, wraps underlying storage).
    pub settings: Arc<dyn SettingsRepository>,
    /// Per-request timeout applied by the router.
    pub request_timeout: Duration,
}

impl AppState {
    /// Wraps one storage backend with the cache decorators.
    fn build<R>(repository: Arc<R>, config: &Config) -> Self
    where
        R: StudentRepository + SongRepository + TeachingRepository + SettingsRepository + 'static,
    {
        use lessonbook_core::cache::MemoryCache;

        use crate::storage::cached::{
            CachedSettingsRepository, CachedSongRepository, CachedStudentRepository,
        };

        let cache = Arc::new(MemoryCache::new(config.cache_ttl()));

        Self {
            students: Arc::new(CachedStudentRepository::new(
                repository.clone(),
                cache.clone(),
            )),
            songs: Arc::new(CachedSongRepository::new(repository.clone(), cache.clone())),
            settings: Arc::new(CachedSettingsRepository::new(repository.clone(), cache)),
            teachings: repository,
            request_timeout: config.request_timeout(),
        }
    }
}

// ============================================================================
// Factory functions for each storage backend
// ============================================================================

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use crate::storage::sqlite::RetryPolicy;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and an in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let policy = RetryPolicy {
                attempts: config.store_connect_attempts,
                backoff: config.store_connect_backoff(),
            };
            let repository = Arc::new(
                SqliteRepository::new(&config.sqlite_path, config.store_pool_size, policy).await?,
            );

            tracing::info!(
                path = %config.sqlite_path,
                pool_size = config.store_pool_size,
                cache_ttl_seconds = config.cache_ttl_seconds,
                "Using SQLite storage"
            );
            Ok(Self::build(repository, config))
        }
    }
}

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::info!(
                cache_ttl_seconds = config.cache_ttl_seconds,
                "Using in-memory storage"
            );
            Ok(Self::build(Arc::new(InMemoryRepository::new()), config))
        }
    }
}

// ============================================================================
// Test support
// ============================================================================

#[cfg(test)]
impl Default for AppState {
    fn default() -> Self {
        let config = Config {
            cache_ttl_seconds: 30,
            sqlite_path: String::new(),
            store_pool_size: 1,
            store_connect_attempts: 1,
            store_connect_backoff_ms: 0,
            request_timeout_seconds: 10,
        };
        Self::build(
            Arc::new(crate::storage::InMemoryRepository::new()),
            &config,
        )
    }
}
