//! Cached song repository decorator.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use lessonbook_core::cache::{song_key, song_pattern, songs_key, Cache};
use lessonbook_core::lesson::Song;
use lessonbook_core::storage::{Result, SongRepository};

use super::{cached, invalidate, invalidate_pattern, Generation};

/// Cached song repository decorator.
///
/// Recording a teaching changes the song document, so it invalidates like
/// any other write.
pub struct CachedSongRepository<R, C>
where
    R: SongRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache: Arc<C>,
    generation: Generation,
}

impl<R, C> CachedSongRepository<R, C>
where
    R: SongRepository,
    C: Cache,
{
    /// Creates a new cached song repository.
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self {
            repository,
            cache,
            generation: Generation::default(),
        }
    }

    async fn invalidate_song(&self, id: Uuid) {
        let _write = self.generation.advance().await;
        invalidate(self.cache.as_ref(), &[songs_key(), song_key(id)]).await;
    }
}

#[async_trait]
impl<R, C> SongRepository for CachedSongRepository<R, C>
where
    R: SongRepository + 'static,
    C: Cache + 'static,
{
    async fn list_songs(&self) -> Result<Vec<Song>> {
        let key = songs_key();
        if let Some(songs) = cached(self.cache.as_ref(), &key).await {
            return Ok(songs);
        }

        let seen = self.generation.current().await;
        let songs = self.repository.list_songs().await?;
        self.generation
            .populate(seen, self.cache.as_ref(), &key, &songs)
            .await;
        Ok(songs)
    }

    async fn get_song(&self, id: Uuid) -> Result<Option<Song>> {
        let key = song_key(id);
        if let Some(song) = cached(self.cache.as_ref(), &key).await {
            return Ok(Some(song));
        }

        let seen = self.generation.current().await;
        let song = self.repository.get_song(id).await?;
        if let Some(ref s) = song {
            self.generation.populate(seen, self.cache.as_ref(), &key, s).await;
        }
        Ok(song)
    }

    async fn create_song(&self, song: &Song) -> Result<()> {
        self.repository.create_song(song).await?;
        self.invalidate_song(song.id).await;

        tracing::debug!(song_id = %song.id, title = %song.title, "Song created");
        Ok(())
    }

    async fn update_song(&self, song: &Song) -> Result<()> {
        self.repository.update_song(song).await?;
        self.invalidate_song(song.id).await;

        tracing::debug!(song_id = %song.id, "Song updated");
        Ok(())
    }

    async fn delete_song(&self, id: Uuid) -> Result<()> {
        self.repository.delete_song(id).await?;
        self.invalidate_song(id).await;

        tracing::debug!(song_id = %id, "Song deleted");
        Ok(())
    }

    async fn record_teaching_on_song(&self, id: Uuid, taught_date: DateTime<Utc>) -> Result<Song> {
        let song = self.repository.record_teaching_on_song(id, taught_date).await?;
        self.invalidate_song(id).await;

        tracing::debug!(song_id = %id, frequency = song.frequency, "Teaching recorded");
        Ok(song)
    }

    async fn replace_songs(&self, songs: &[Song]) -> Result<()> {
        self.repository.replace_songs(songs).await?;
        let _write = self.generation.advance().await;
        invalidate(self.cache.as_ref(), &[songs_key()]).await;
        invalidate_pattern(self.cache.as_ref(), &song_pattern()).await;

        tracing::debug!(count = songs.len(), "Songs replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use lessonbook_core::cache::MemoryCache;

    use crate::storage::InMemoryRepository;

    fn setup() -> (
        Arc<InMemoryRepository>,
        Arc<MemoryCache>,
        CachedSongRepository<InMemoryRepository, MemoryCache>,
    ) {
        let repo = Arc::new(InMemoryRepository::new());
        let cache = Arc::new(MemoryCache::new(Duration::from_secs(30)));
        let songs = CachedSongRepository::new(repo.clone(), cache.clone());
        (repo, cache, songs)
    }

    #[tokio::test]
    async fn test_get_populates_cache() {
        let (repo, cache, songs) = setup();
        let song = Song::new("Tune", "Trad");
        repo.create_song(&song).await.unwrap();

        songs.get_song(song.id).await.unwrap();

        assert_eq!(cache.len().await, 1);
        assert!(cache.get(&song_key(song.id)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cached_value_served_without_store() {
        let (repo, _cache, songs) = setup();
        let song = Song::new("Tune", "Trad");
        songs.create_song(&song).await.unwrap();
        songs.get_song(song.id).await.unwrap();

        // Bypass the decorator: the cached copy is still served
        repo.replace_songs(&[]).await.unwrap();

        assert!(songs.get_song(song.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_record_teaching_invalidates() {
        let (_repo, _cache, songs) = setup();
        let song = Song::new("Tune", "Trad");
        songs.create_song(&song).await.unwrap();
        assert_eq!(songs.get_song(song.id).await.unwrap().unwrap().frequency, 0);
        assert_eq!(songs.list_songs().await.unwrap()[0].frequency, 0);

        songs.record_teaching_on_song(song.id, Utc::now()).await.unwrap();

        assert_eq!(songs.get_song(song.id).await.unwrap().unwrap().frequency, 1);
        assert_eq!(songs.list_songs().await.unwrap()[0].frequency, 1);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_alone() {
        let (_repo, cache, songs) = setup();
        let song = Song::new("Tune", "Trad");
        songs.create_song(&song).await.unwrap();
        songs.list_songs().await.unwrap();

        assert!(songs.delete_song(Uuid::new_v4()).await.is_err());

        assert!(cache.get(&songs_key()).await.unwrap().is_some());
    }
}
