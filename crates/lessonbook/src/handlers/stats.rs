//! Dashboard statistics handler.

use axum::{extract::State, Json};
use chrono::{Datelike, Local};

use lessonbook_core::lesson::{compute_dashboard_stats, DashboardStats};

use super::AppError;
use crate::state::AppState;

/// Dashboard statistics (GET /api/stats).
///
/// Read fresh on every request. "Today" is the server's local weekday.
#[axum::debug_handler]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let students = state.students.list_students().await?;
    let songs = state.songs.list_songs().await?;
    let teachings = state.teachings.list_teachings().await?;

    let stats = compute_dashboard_stats(
        &students,
        songs.len() as u64,
        teachings.len() as u64,
        Local::now().weekday(),
    );

    tracing::debug!(
        students = stats.counts.students,
        students_today = stats.counts.students_today,
        "Computed dashboard stats"
    );
    Ok(Json(stats))
}
