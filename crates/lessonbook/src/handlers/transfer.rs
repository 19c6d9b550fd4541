//! Export and import handlers.

use axum::{extract::State, Json};

use lessonbook_core::lesson::{validate_import, ExportBundle, ImportBundle, ImportSummary};

use super::{ApiJson, AppError};
use crate::state::AppState;

/// Export every collection (GET /api/export).
#[axum::debug_handler]
pub async fn export_data(State(state): State<AppState>) -> Result<Json<ExportBundle>, AppError> {
    let bundle = ExportBundle::new(
        state.students.list_students().await?,
        state.songs.list_songs().await?,
        state.teachings.list_teachings().await?,
        state.settings.get_settings().await?,
    );

    tracing::info!(
        students = bundle.students.len(),
        songs = bundle.songs.len(),
        teachings = bundle.song_teachings.len(),
        "Exported data"
    );
    Ok(Json(bundle))
}

/// Import a bundle (POST /api/import).
///
/// Every collection present replaces the stored one. Nothing is written
/// unless every student and song in the bundle is valid and no id repeats
/// within a collection.
#[axum::debug_handler]
pub async fn import_data(
    State(state): State<AppState>,
    ApiJson(mut bundle): ApiJson<ImportBundle>,
) -> Result<Json<ImportSummary>, AppError> {
    validate_import(&mut bundle)?;

    let mut summary = ImportSummary::default();

    if let Some(students) = bundle.students {
        state.students.replace_students(&students).await?;
        summary.students = Some(students.len());
    }
    if let Some(songs) = bundle.songs {
        state.songs.replace_songs(&songs).await?;
        summary.songs = Some(songs.len());
    }
    if let Some(teachings) = bundle.song_teachings {
        state.teachings.replace_teachings(&teachings).await?;
        summary.song_teachings = Some(teachings.len());
    }
    if let Some(settings) = bundle.settings {
        state.settings.save_settings(&settings).await?;
        summary.settings = Some(1);
    }

    tracing::info!(?summary, "Imported data");
    Ok(Json(summary))
}
