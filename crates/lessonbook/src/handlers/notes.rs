//! Lesson note handlers.
//!
//! Notes are embedded in their student; every route is nested under
//! `/api/students/{id}/notes`.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::Value;
use uuid::Uuid;

use lessonbook_core::lesson::{validate_note, CreateNoteRequest, Note, UpdateNoteRequest};
use lessonbook_core::storage::RepositoryError;

use super::students::load_student;
use super::{success, ApiJson, ApiPath, AppError};
use crate::state::AppState;

/// List a student's notes (GET /api/students/{id}/notes).
#[axum::debug_handler]
pub async fn list_notes(
    State(state): State<AppState>,
    ApiPath(student_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Note>>, AppError> {
    let student = load_student(&state, student_id).await?;
    Ok(Json(student.notes))
}

/// Add a note to a student (POST /api/students/{id}/notes).
#[axum::debug_handler]
pub async fn create_note(
    State(state): State<AppState>,
    ApiPath(student_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<CreateNoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let note = payload.into_note();
    validate_note(&note)?;

    state.students.add_note(student_id, &note).await?;

    tracing::info!(%student_id, note_id = %note.id, "Added note");
    Ok((StatusCode::CREATED, Json(note)))
}

/// Get one note (GET /api/students/{id}/notes/{noteId}).
#[axum::debug_handler]
pub async fn get_note(
    State(state): State<AppState>,
    ApiPath((student_id, note_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Note>, AppError> {
    let student = load_student(&state, student_id).await?;
    let note = student
        .note(note_id)
        .cloned()
        .ok_or_else(|| RepositoryError::note_not_found(note_id))?;
    Ok(Json(note))
}

/// Edit a note (PUT /api/students/{id}/notes/{noteId}).
#[axum::debug_handler]
pub async fn update_note(
    State(state): State<AppState>,
    ApiPath((student_id, note_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<UpdateNoteRequest>,
) -> Result<Json<Note>, AppError> {
    let student = load_student(&state, student_id).await?;
    let mut note = student
        .note(note_id)
        .cloned()
        .ok_or_else(|| RepositoryError::note_not_found(note_id))?;

    payload.apply_to(&mut note);
    validate_note(&note)?;

    state.students.update_note(student_id, &note).await?;

    tracing::info!(%student_id, %note_id, "Updated note");
    Ok(Json(note))
}

/// Delete a note (DELETE /api/students/{id}/notes/{noteId}).
#[axum::debug_handler]
pub async fn delete_note(
    State(state): State<AppState>,
    ApiPath((student_id, note_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    state.students.delete_note(student_id, note_id).await?;

    tracing::info!(%student_id, %note_id, "Deleted note");
    Ok(success())
}
