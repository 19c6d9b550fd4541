//! Settings and instrument list handlers.
//!
//! The instrument list lives inside the settings document; the instrument
//! routes are a narrower view onto the same document.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::Value;

use lessonbook_core::lesson::{
    add_instrument, remove_instrument, rename_instrument, InstrumentError, InstrumentRequest,
    Settings, UpdateSettingsRequest,
};

use super::{success, ApiJson, ApiPath, AppError};
use crate::state::AppState;

/// Loads settings, applies `change` and saves the result.
async fn modify_settings<F>(state: &AppState, change: F) -> Result<Settings, AppError>
where
    F: FnOnce(&mut Settings) -> Result<(), AppError>,
{
    let mut settings = state.settings.get_settings().await?;
    change(&mut settings)?;
    settings.updated_at = Some(Utc::now());
    state.settings.save_settings(&settings).await?;
    Ok(settings)
}

/// Trims a full instrument list, rejecting blanks and duplicates.
fn checked_instruments(names: &[String]) -> Result<Vec<String>, InstrumentError> {
    let mut checked = Settings::default();
    for name in names {
        add_instrument(&mut checked, name)?;
    }
    Ok(checked.instruments)
}

/// Get the settings document (GET /api/settings).
#[axum::debug_handler]
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, AppError> {
    Ok(Json(state.settings.get_settings().await?))
}

/// Update the settings document (PUT /api/settings).
///
/// A given `instruments` list replaces the stored one and must be free of
/// blanks and case-insensitive duplicates. Other keys are merged.
#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<UpdateSettingsRequest>,
) -> Result<Json<Settings>, AppError> {
    let instruments = payload
        .instruments
        .take()
        .map(|names| checked_instruments(&names))
        .transpose()?;

    let settings = modify_settings(&state, |settings| {
        payload.apply_to(settings);
        if let Some(instruments) = instruments {
            settings.instruments = instruments;
        }
        Ok(())
    })
    .await?;

    tracing::info!(instruments = settings.instruments.len(), "Updated settings");
    Ok(Json(settings))
}

/// List instruments (GET /api/settings/instruments).
#[axum::debug_handler]
pub async fn list_instruments(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.settings.get_settings().await?.instruments))
}

/// Add an instrument (POST /api/settings/instruments).
#[axum::debug_handler]
pub async fn create_instrument(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<InstrumentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let settings = modify_settings(&state, |settings| {
        add_instrument(settings, &payload.name).map_err(AppError::from)
    })
    .await?;

    tracing::info!(name = %payload.name.trim(), "Added instrument");
    Ok((StatusCode::CREATED, Json(settings.instruments)))
}

/// Rename an instrument (PUT /api/settings/instruments/{name}).
#[axum::debug_handler]
pub async fn rename_instrument_handler(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiJson(payload): ApiJson<InstrumentRequest>,
) -> Result<Json<Vec<String>>, AppError> {
    let settings = modify_settings(&state, |settings| {
        rename_instrument(settings, &name, &payload.name).map_err(AppError::from)
    })
    .await?;

    tracing::info!(from = %name, to = %payload.name.trim(), "Renamed instrument");
    Ok(Json(settings.instruments))
}

/// Remove an instrument (DELETE /api/settings/instruments/{name}).
#[axum::debug_handler]
pub async fn delete_instrument(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> Result<Json<Value>, AppError> {
    modify_settings(&state, |settings| {
        remove_instrument(settings, &name).map_err(AppError::from)
    })
    .await?;

    tracing::info!(%name, "Removed instrument");
    Ok(success())
}
