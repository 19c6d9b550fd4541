//! Song library and teaching record handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use lessonbook_core::lesson::{
    sort_songs_by_title, validate_song, CreateSongRequest, RecordTeachingRequest, Song,
    SongTeaching, TeachingRecorded, UpdateSongRequest,
};
use lessonbook_core::storage::RepositoryError;

use super::students::load_student;
use super::{success, ApiJson, ApiPath, ApiQuery, AppError};
use crate::state::AppState;

/// Query parameters for listing teaching records.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTeachingsQuery {
    pub student_id: Option<Uuid>,
    pub song_id: Option<Uuid>,
}

/// List all songs ordered by title (GET /api/songs).
#[axum::debug_handler]
pub async fn list_songs(State(state): State<AppState>) -> Result<Json<Vec<Song>>, AppError> {
    let mut songs = state.songs.list_songs().await?;
    sort_songs_by_title(&mut songs);
    Ok(Json(songs))
}

/// Add a song to the library (POST /api/songs).
#[axum::debug_handler]
pub async fn create_song(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateSongRequest>,
) -> Result<impl IntoResponse, AppError> {
    let song = payload.into_song();
    validate_song(&song)?;

    state.songs.create_song(&song).await?;

    tracing::info!(song_id = %song.id, title = %song.title, "Created song");
    Ok((StatusCode::CREATED, Json(song)))
}

/// Get a single song (GET /api/songs/{id}).
#[axum::debug_handler]
pub async fn get_song(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Song>, AppError> {
    let song = state
        .songs
        .get_song(id)
        .await?
        .ok_or_else(|| RepositoryError::song_not_found(id))?;
    Ok(Json(song))
}

/// Update a song (PUT /api/songs/{id}).
///
/// The teach count is not part of the request and never changes here.
#[axum::debug_handler]
pub async fn update_song(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateSongRequest>,
) -> Result<Json<Song>, AppError> {
    let mut song = state
        .songs
        .get_song(id)
        .await?
        .ok_or_else(|| RepositoryError::song_not_found(id))?;

    payload.apply_to(&mut song);
    validate_song(&song)?;

    state.songs.update_song(&song).await?;

    tracing::info!(song_id = %id, "Updated song");
    Ok(Json(song))
}

/// Delete a song and its teaching records (DELETE /api/songs/{id}).
#[axum::debug_handler]
pub async fn delete_song(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.songs.delete_song(id).await?;
    let teachings = state.teachings.delete_teachings_for_song(id).await?;

    tracing::info!(song_id = %id, teachings, "Deleted song");
    Ok(success())
}

/// Record that a song was taught to a student (POST /api/songs/teaching).
///
/// Stores a teaching record and increments the song's teach count by one.
///
/// The record is written before the count, so a failed insert leaves the
/// song untouched. The count bump itself only fails if the song was deleted
/// in between, and that delete also drops the song's records.
#[axum::debug_handler]
pub async fn record_teaching(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RecordTeachingRequest>,
) -> Result<impl IntoResponse, AppError> {
    load_student(&state, payload.student_id).await?;
    if state.songs.get_song(payload.song_id).await?.is_none() {
        return Err(RepositoryError::song_not_found(payload.song_id).into());
    }

    let teaching = payload.into_teaching();
    state.teachings.create_teaching(&teaching).await?;
    let song = state
        .songs
        .record_teaching_on_song(teaching.song_id, teaching.taught_date)
        .await?;

    tracing::info!(
        song_id = %song.id,
        student_id = %teaching.student_id,
        frequency = song.frequency,
        "Recorded teaching"
    );
    Ok((StatusCode::CREATED, Json(TeachingRecorded { teaching, song })))
}

/// List teaching records, newest first (GET /api/songs/teaching).
#[axum::debug_handler]
pub async fn list_teachings(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListTeachingsQuery>,
) -> Result<Json<Vec<SongTeaching>>, AppError> {
    let teachings = state
        .teachings
        .list_teachings()
        .await?
        .into_iter()
        .filter(|t| query.student_id.is_none_or(|id| t.student_id == id))
        .filter(|t| query.song_id.is_none_or(|id| t.song_id == id))
        .collect();
    Ok(Json(teachings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lessonbook_core::lesson::Student;

    async fn seeded() -> (AppState, Student, Song) {
        let state = AppState::default();
        let student = Student::new("Ana", "Guitar", "1", "Monday", "10:00");
        let song = Song::new("Blackbird", "The Beatles");
        state.students.create_student(&student).await.unwrap();
        state.songs.create_song(&song).await.unwrap();
        (state, student, song)
    }

    #[tokio::test]
    async fn test_record_teaching_increments_once() {
        let (state, student, song) = seeded().await;
        let date = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        let mut payload = RecordTeachingRequest::new(song.id, student.id);
        payload.taught_date = Some(date);

        record_teaching(State(state.clone()), ApiJson(payload))
            .await
            .map_err(|e| e.0)
            .unwrap();

        let stored = state.songs.get_song(song.id).await.unwrap().unwrap();
        assert_eq!(stored.frequency, 1);
        assert_eq!(stored.last_taught, Some(date));
        assert_eq!(state.teachings.list_teachings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_teaching_unknown_student_changes_nothing() {
        let (state, _student, song) = seeded().await;
        let payload = RecordTeachingRequest::new(song.id, Uuid::new_v4());

        let result = record_teaching(State(state.clone()), ApiJson(payload)).await;

        assert!(result.is_err());
        let stored = state.songs.get_song(song.id).await.unwrap().unwrap();
        assert_eq!(stored.frequency, 0);
        assert!(state.teachings.list_teachings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_teaching_unknown_song_writes_no_record() {
        let (state, student, _song) = seeded().await;
        let payload = RecordTeachingRequest::new(Uuid::new_v4(), student.id);

        let err = record_teaching(State(state.clone()), ApiJson(payload))
            .await
            .err()
            .unwrap();

        assert!(err.0.downcast_ref::<RepositoryError>().is_some());
        assert!(state.teachings.list_teachings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_teachings_filters() {
        let (state, student, song) = seeded().await;
        let other = Student::new("Bea", "Piano", "2", "Tuesday", "11:00");
        state.students.create_student(&other).await.unwrap();
        for student_id in [student.id, other.id, other.id] {
            let payload = RecordTeachingRequest::new(song.id, student_id);
            record_teaching(State(state.clone()), ApiJson(payload))
                .await
                .map_err(|e| e.0)
                .unwrap();
        }

        let query = ListTeachingsQuery {
            student_id: Some(other.id),
            song_id: None,
        };
        let Json(records) = list_teachings(State(state.clone()), ApiQuery(query))
            .await
            .map_err(|e| e.0)
            .unwrap();
        assert_eq!(records.len(), 2);

        let Json(all) = list_teachings(State(state), ApiQuery(ListTeachingsQuery::default()))
            .await
            .map_err(|e| e.0)
            .unwrap();
        assert_eq!(all.len(), 3);
    }
}
