//! Pure functions for mapping domain errors to HTTP status codes.

use super::RepositoryError;
use crate::lesson::InstrumentError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists` -> 409 (Conflict)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use lessonbook_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Student",
///     id: "abc-123".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}

/// Maps an [`InstrumentError`] to an HTTP status code.
///
/// A blank name is a bad request, a duplicate is a conflict and an unknown
/// name is not found.
pub fn instrument_error_to_status_code(error: &InstrumentError) -> u16 {
    match error {
        InstrumentError::EmptyName => 400,
        InstrumentError::Duplicate(_) => 409,
        InstrumentError::NotFound(_) => 404,
    }
}
