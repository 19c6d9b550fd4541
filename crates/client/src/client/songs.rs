//! Song and teaching record API operations.

use uuid::Uuid;

use lessonbook_core::lesson::{
    CreateSongRequest, RecordTeachingRequest, Song, SongTeaching, TeachingRecorded,
    UpdateSongRequest,
};

use super::LessonbookClient;
use crate::error::Result;

impl LessonbookClient {
    /// List all songs, ordered by title.
    pub async fn list_songs(&self) -> Result<Vec<Song>> {
        self.get("/api/songs").await
    }

    /// Get song by ID.
    pub async fn get_song(&self, id: Uuid) -> Result<Song> {
        self.get(&format!("/api/songs/{id}")).await
    }

    /// Add a song to the library.
    pub async fn create_song(&self, request: &CreateSongRequest) -> Result<Song> {
        self.post("/api/songs", request).await
    }

    /// Update a song.
    pub async fn update_song(&self, id: Uuid, request: &UpdateSongRequest) -> Result<Song> {
        self.put(&format!("/api/songs/{id}"), request).await
    }

    /// Delete a song and its teaching records.
    pub async fn delete_song(&self, id: Uuid) -> Result<()> {
        self.delete(&format!("/api/songs/{id}")).await
    }

    /// Record that a song was taught to a student.
    pub async fn record_teaching(&self, request: &RecordTeachingRequest) -> Result<TeachingRecorded> {
        self.post("/api/songs/teaching", request).await
    }

    /// List teaching records, newest first, optionally filtered.
    pub async fn list_teachings(
        &self,
        student_id: Option<Uuid>,
        song_id: Option<Uuid>,
    ) -> Result<Vec<SongTeaching>> {
        self.get(&teachings_path(student_id, song_id)).await
    }
}

fn teachings_path(student_id: Option<Uuid>, song_id: Option<Uuid>) -> String {
    let filters: Vec<String> = [("studentId", student_id), ("songId", song_id)]
        .into_iter()
        .filter_map(|(name, id)| id.map(|id| format!("{name}={id}")))
        .collect();

    if filters.is_empty() {
        "/api/songs/teaching".to_string()
    } else {
        format!("/api/songs/teaching?{}", filters.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teachings_path() {
        let id = Uuid::nil();
        assert_eq!(teachings_path(None, None), "/api/songs/teaching");
        assert_eq!(
            teachings_path(Some(id), None),
            format!("/api/songs/teaching?studentId={id}")
        );
        assert_eq!(
            teachings_path(Some(id), Some(id)),
            format!("/api/songs/teaching?studentId={id}&songId={id}")
        );
    }
}
