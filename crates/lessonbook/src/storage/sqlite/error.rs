//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError`.
//! Constraint violations become semantic variants; errors raised inside a
//! connection closure travel back boxed in `tokio_rusqlite::Error::Other`.

use lessonbook_core::storage::RepositoryError;

/// Wraps a rusqlite error for return from a `tokio_rusqlite` closure.
pub fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Carries a domain error out of a `tokio_rusqlite` closure.
pub fn domain_err(e: RepositoryError) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Other(Box::new(e))
}

/// Carries a JSON error out of a `tokio_rusqlite` closure.
pub fn json_err(e: serde_json::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Other(Box::new(e))
}

fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str, id: &str) -> RepositoryError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepositoryError::AlreadyExists {
                entity_type,
                id: id.to_string(),
            }
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            RepositoryError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::DatabaseBusy =>
        {
            RepositoryError::ConnectionFailed(format!("Database busy: {err}"))
        }

        rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
            entity_type,
            id: id.to_string(),
        },

        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a RepositoryError.
///
/// Use `"unknown"` as the ID when none is available at the call site.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let id = id.into();
    match err {
        tokio_rusqlite::Error::Rusqlite(ref rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type, &id)
        }
        tokio_rusqlite::Error::Close(_) | tokio_rusqlite::Error::ConnectionClosed => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        tokio_rusqlite::Error::Other(inner) => {
            if let Some(domain) = inner.downcast_ref::<RepositoryError>() {
                domain.clone()
            } else if inner.is::<serde_json::Error>() {
                RepositoryError::Serialization(inner.to_string())
            } else {
                RepositoryError::QueryFailed(inner.to_string())
            }
        }
        other => RepositoryError::QueryFailed(other.to_string()),
    }
}
