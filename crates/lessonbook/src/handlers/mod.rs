pub mod error;
pub mod extract;
pub mod health;
pub mod notes;
pub mod settings;
pub mod songs;
pub mod stats;
pub mod students;
pub mod transfer;

pub use error::AppError;
pub use extract::{ApiJson, ApiPath, ApiQuery};

use axum::Json;
use serde_json::{json, Value};

/// Body returned by every successful delete.
pub(crate) fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}
