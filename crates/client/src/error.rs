//! Client error types.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Message shown when the server gave no usable error text.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The server answered with an error status. `message` is the `error`
    /// field of the response envelope.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The failure of a request whose result was shared between callers.
    #[error(transparent)]
    Shared(Arc<ClientError>),
}

impl ClientError {
    /// HTTP status of an API error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Shared(inner) => inner.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Text suitable for an error slot in the UI.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Timeout(_) => self.to_string(),
            Self::Shared(inner) => inner.user_message(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Extracts the `error` field of an error envelope, falling back to the
/// generic message.
pub(crate) fn envelope_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_message() {
        assert_eq!(envelope_message(r#"{"error":"Student not found"}"#), "Student not found");
        assert_eq!(envelope_message(r#"{"error":""}"#), GENERIC_ERROR_MESSAGE);
        assert_eq!(envelope_message("<html>oops</html>"), GENERIC_ERROR_MESSAGE);
        assert_eq!(envelope_message(r#"{"message":"x"}"#), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_user_message_unwraps_shared() {
        let err = ClientError::Shared(Arc::new(ClientError::Api {
            status: 409,
            message: "Instrument already exists: Guitar".to_string(),
        }));

        assert_eq!(err.status(), Some(409));
        assert_eq!(err.user_message(), "Instrument already exists: Guitar");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ClientError::InvalidResponse("truncated".to_string());
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }
}
