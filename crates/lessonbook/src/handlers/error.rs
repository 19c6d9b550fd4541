use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use lessonbook_core::lesson::{FieldError, InstrumentError, ValidationErrors};
use lessonbook_core::storage::{
    instrument_error_to_status_code, repository_error_to_status_code, RepositoryError,
};

/// Handler error. Wraps any error and picks a status code by downcasting to
/// the domain error types; everything else is a 500.
pub struct AppError(pub anyhow::Error);

/// The JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

impl AppError {
    fn status_and_details(&self) -> (StatusCode, Option<Vec<FieldError>>) {
        let err = &self.0;

        if let Some(validation) = err.downcast_ref::<ValidationErrors>() {
            return (StatusCode::BAD_REQUEST, Some(validation.errors.clone()));
        }
        if let Some(repo_error) = err.downcast_ref::<RepositoryError>() {
            return (status(repository_error_to_status_code(repo_error)), None);
        }
        if let Some(instrument_error) = err.downcast_ref::<InstrumentError>() {
            return (status(instrument_error_to_status_code(instrument_error)), None);
        }
        if err.is::<JsonRejection>() || err.is::<PathRejection>() || err.is::<QueryRejection>() {
            return (StatusCode::BAD_REQUEST, None);
        }

        (StatusCode::INTERNAL_SERVER_ERROR, None)
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, details) = self.status_and_details();

        if status_code.is_server_error() {
            tracing::error!(status = %status_code, error = %self.0, "Request failed");
        } else {
            tracing::warn!(status = %status_code, error = %self.0, "Request rejected");
        }

        let body = ErrorBody {
            error: self.0.to_string(),
            details,
        };
        (status_code, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_has_details() {
        let err = AppError::from(ValidationErrors::single("name", "is required"));

        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["field"], "name");
        assert_eq!(body["details"][0]["message"], "is required");
        assert!(body["error"].as_str().unwrap().contains("Validation failed"));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let err = AppError::from(RepositoryError::student_not_found(uuid::Uuid::nil()));

        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_instrument_duplicate_maps_to_409() {
        let err = AppError::from(InstrumentError::Duplicate("Guitar".to_string()));

        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Instrument already exists: Guitar");
    }

    #[tokio::test]
    async fn test_unknown_error_is_500() {
        let err = AppError(anyhow::anyhow!("boom"));

        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "boom");
    }
}
