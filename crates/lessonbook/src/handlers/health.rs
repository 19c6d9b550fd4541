//! Liveness check.

use axum::http::StatusCode;

/// GET /livez - Basic liveness check.
///
/// Returns 200 immediately without touching storage.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}
