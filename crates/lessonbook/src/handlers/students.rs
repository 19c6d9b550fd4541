//! Student CRUD handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::Value;
use uuid::Uuid;

use lessonbook_core::lesson::{
    prepare_student, sort_students_by_name, CreateStudentRequest, Student, UpdateStudentRequest,
};
use lessonbook_core::storage::RepositoryError;

use super::{success, ApiJson, ApiPath, AppError};
use crate::state::AppState;

/// Loads a student or fails with 404.
pub(crate) async fn load_student(state: &AppState, id: Uuid) -> Result<Student, AppError> {
    state
        .students
        .get_student(id)
        .await?
        .ok_or_else(|| RepositoryError::student_not_found(id).into())
}

/// List all students ordered by name (GET /api/students).
#[axum::debug_handler]
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    let mut students = state.students.list_students().await?;
    sort_students_by_name(&mut students);
    Ok(Json(students))
}

/// Create a new student (POST /api/students).
#[axum::debug_handler]
pub async fn create_student(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut student = payload.into_student();
    prepare_student(&mut student)?;

    state.students.create_student(&student).await?;

    tracing::info!(student_id = %student.id, name = %student.name, "Created student");
    Ok((StatusCode::CREATED, Json(student)))
}

/// Get a single student by ID (GET /api/students/{id}).
#[axum::debug_handler]
pub async fn get_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(load_student(&state, id).await?))
}

/// Update a student (PUT /api/students/{id}).
///
/// Absent fields keep their stored values.
#[axum::debug_handler]
pub async fn update_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateStudentRequest>,
) -> Result<Json<Student>, AppError> {
    let mut student = load_student(&state, id).await?;
    payload.apply_to(&mut student);
    prepare_student(&mut student)?;

    state.students.update_student(&student).await?;

    tracing::info!(student_id = %id, "Updated student");
    Ok(Json(student))
}

/// Delete a student and their teaching records (DELETE /api/students/{id}).
#[axum::debug_handler]
pub async fn delete_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.students.delete_student(id).await?;
    let teachings = state.teachings.delete_teachings_for_student(id).await?;

    tracing::info!(student_id = %id, teachings, "Deleted student");
    Ok(success())
}
