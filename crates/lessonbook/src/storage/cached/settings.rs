//! Cached settings repository decorator.

use std::sync::Arc;

use async_trait::async_trait;

use lessonbook_core::cache::{settings_key, Cache};
use lessonbook_core::lesson::Settings;
use lessonbook_core::storage::{Result, SettingsRepository};

use super::{cached, invalidate, Generation};

/// Cached settings repository decorator.
pub struct CachedSettingsRepository<R, C>
where
    R: SettingsRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache: Arc<C>,
    generation: Generation,
}

impl<R, C> CachedSettingsRepository<R, C>
where
    R: SettingsRepository,
    C: Cache,
{
    /// Creates a new cached settings repository.
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self {
            repository,
            cache,
            generation: Generation::default(),
        }
    }
}

#[async_trait]
impl<R, C> SettingsRepository for CachedSettingsRepository<R, C>
where
    R: SettingsRepository + 'static,
    C: Cache + 'static,
{
    async fn get_settings(&self) -> Result<Settings> {
        let key = settings_key();
        if let Some(settings) = cached(self.cache.as_ref(), &key).await {
            return Ok(settings);
        }

        let seen = self.generation.current().await;
        let settings = self.repository.get_settings().await?;
        self.generation
            .populate(seen, self.cache.as_ref(), &key, &settings)
            .await;
        Ok(settings)
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.repository.save_settings(settings).await?;
        {
            let _write = self.generation.advance().await;
            invalidate(self.cache.as_ref(), &[settings_key()]).await;
        }

        tracing::debug!(instruments = settings.instruments.len(), "Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use lessonbook_core::cache::MemoryCache;

    use crate::storage::InMemoryRepository;

    #[tokio::test]
    async fn test_save_then_get_is_fresh() {
        let repo = Arc::new(InMemoryRepository::new());
        let cache = Arc::new(MemoryCache::new(Duration::from_secs(30)));
        let settings = CachedSettingsRepository::new(repo, cache.clone());

        assert!(settings.get_settings().await.unwrap().instruments.is_empty());
        assert_eq!(cache.len().await, 1);

        settings
            .save_settings(&Settings::with_instruments(["Guitar"]))
            .await
            .unwrap();

        assert!(cache.is_empty().await);
        assert_eq!(
            settings.get_settings().await.unwrap().instruments,
            vec!["Guitar"]
        );
    }

    #[tokio::test]
    async fn test_extra_keys_survive_the_cache() {
        let repo = Arc::new(InMemoryRepository::new());
        let cache = Arc::new(MemoryCache::new(Duration::from_secs(30)));
        let settings = CachedSettingsRepository::new(repo, cache);

        let mut doc = Settings::with_instruments(["Piano"]);
        doc.extra.insert("theme".to_string(), serde_json::json!("dark"));
        settings.save_settings(&doc).await.unwrap();

        // First read fills the cache, second read comes from it
        settings.get_settings().await.unwrap();
        let from_cache = settings.get_settings().await.unwrap();

        assert_eq!(from_cache, doc);
    }
}
