use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Shorthand for a missing student.
    pub fn student_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Student",
            id: id.to_string(),
        }
    }

    /// Shorthand for a missing note.
    pub fn note_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Note",
            id: id.to_string(),
        }
    }

    /// Shorthand for a missing song.
    pub fn song_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Song",
            id: id.to_string(),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Student",
            id: "abc-123".to_string(),
        };
        assert_eq!(error.to_string(), "Student not found: abc-123");
    }

    #[test]
    fn test_repository_error_already_exists_display() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Song",
            id: "my-song".to_string(),
        };
        assert_eq!(error.to_string(), "Song already exists: my-song");
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("database is locked".to_string());
        assert_eq!(error.to_string(), "Connection failed: database is locked");
    }

    #[test]
    fn test_repository_error_query_failed_display() {
        let error = RepositoryError::QueryFailed("no such table: students".to_string());
        assert_eq!(error.to_string(), "Query failed: no such table: students");
    }

    #[test]
    fn test_not_found_shorthands() {
        assert_eq!(
            RepositoryError::note_not_found("n1").to_string(),
            "Note not found: n1"
        );
        assert!(matches!(
            RepositoryError::song_not_found("s1"),
            RepositoryError::NotFound {
                entity_type: "Song",
                ..
            }
        ));
    }

    #[test]
    fn test_serde_json_error_converts() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::Serialization(_)
        ));
    }

    #[test]
    fn test_repository_error_serialization_display() {
        let error = RepositoryError::Serialization("missing required field".to_string());
        assert_eq!(
            error.to_string(),
            "Serialization error: missing required field"
        );
    }

    #[test]
    fn test_repository_error_invalid_data_display() {
        let error = RepositoryError::InvalidData("note id is not unique".to_string());
        assert_eq!(error.to_string(), "Invalid data: note id is not unique");
    }
}
