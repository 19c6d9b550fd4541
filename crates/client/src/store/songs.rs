//! Song library store.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use lessonbook_core::lesson::{
    sort_songs_by_title, CreateSongRequest, RecordTeachingRequest, Song, TeachingRecorded,
    UpdateSongRequest,
};

use super::{load, optimistic, LessonApi, StoreState};
use crate::error::Result;

/// Local mirror of `/api/songs`.
pub struct SongStore<A: LessonApi> {
    api: Arc<A>,
    state: RwLock<StoreState<Vec<Song>>>,
}

impl<A: LessonApi> SongStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: RwLock::new(StoreState::default()),
        }
    }

    pub async fn snapshot(&self) -> StoreState<Vec<Song>> {
        self.state.read().await.clone()
    }

    pub async fn song(&self, id: Uuid) -> Option<Song> {
        self.state
            .read()
            .await
            .data
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub async fn fetch(&self) -> Result<()> {
        load(&self.state, self.api.list_songs()).await
    }

    pub async fn create(&self, request: CreateSongRequest) -> Result<Song> {
        let placeholder = request.clone().into_song();
        let temp_id = placeholder.id;

        optimistic(
            &self.state,
            |songs| {
                songs.push(placeholder);
                sort_songs_by_title(songs);
            },
            self.api.create_song(&request),
            |songs, created| replace_song(songs, temp_id, created),
        )
        .await
    }

    pub async fn update(&self, id: Uuid, request: UpdateSongRequest) -> Result<Song> {
        let local = request.clone();
        optimistic(
            &self.state,
            |songs| {
                if let Some(song) = songs.iter_mut().find(|s| s.id == id) {
                    local.apply_to(song);
                }
            },
            self.api.update_song(id, &request),
            |songs, updated| replace_song(songs, id, updated),
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        optimistic(
            &self.state,
            |songs| songs.retain(|s| s.id != id),
            self.api.delete_song(id),
            |_, _| {},
        )
        .await
    }

    /// Bumps the teach count locally, then takes the server's count.
    pub async fn record_teaching(&self, request: RecordTeachingRequest) -> Result<TeachingRecorded> {
        let song_id = request.song_id;
        let taught = request.taught_date.unwrap_or_else(Utc::now);

        optimistic(
            &self.state,
            |songs| {
                if let Some(song) = songs.iter_mut().find(|s| s.id == song_id) {
                    song.frequency += 1;
                    song.last_taught = Some(taught);
                }
            },
            self.api.record_teaching(&request),
            |songs, recorded| replace_song(songs, song_id, &recorded.song),
        )
        .await
    }
}

fn replace_song(songs: &mut Vec<Song>, id: Uuid, stored: &Song) {
    match songs.iter_mut().find(|s| s.id == id) {
        Some(slot) => *slot = stored.clone(),
        None => songs.push(stored.clone()),
    }
    sort_songs_by_title(songs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::store::mock::MockApi;

    async fn seeded() -> (Arc<MockApi>, SongStore<MockApi>, Song) {
        let api = Arc::new(MockApi::default());
        let song = Song::new("Blackbird", "The Beatles");
        api.songs.lock().unwrap().push(song.clone());

        let store = SongStore::new(api.clone());
        store.fetch().await.unwrap();
        (api, store, song)
    }

    #[tokio::test]
    async fn test_create_keeps_title_order() {
        let (_api, store, _) = seeded().await;

        store
            .create(CreateSongRequest::new("Autumn Leaves", "Kosma"))
            .await
            .unwrap();

        let titles: Vec<String> = store
            .snapshot()
            .await
            .data
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Autumn Leaves", "Blackbird"]);
    }

    #[tokio::test]
    async fn test_record_teaching_increments_once() {
        let (_api, store, song) = seeded().await;
        let date = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        let mut request = RecordTeachingRequest::new(song.id, Uuid::new_v4());
        request.taught_date = Some(date);

        let recorded = store.record_teaching(request).await.unwrap();

        assert_eq!(recorded.song.frequency, 1);
        let stored = store.song(song.id).await.unwrap();
        assert_eq!(stored.frequency, 1);
        assert_eq!(stored.last_taught, Some(date));
    }

    #[tokio::test]
    async fn test_failed_record_teaching_rolls_back() {
        let (api, store, song) = seeded().await;
        api.fail();

        let result = store
            .record_teaching(RecordTeachingRequest::new(song.id, Uuid::new_v4()))
            .await;

        assert!(result.is_err());
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.data, vec![song]);
        assert_eq!(snapshot.error.as_deref(), Some("Server exploded"));
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_songs() {
        let (api, store, song) = seeded().await;
        api.fail();

        assert!(store.fetch().await.is_err());

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.data, vec![song]);
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_some());
        assert_eq!(api.calls(), 2);
    }
}
