//! Settings document and instrument list store.
//!
//! Instrument changes always go to the server. The local rules only decide
//! whether the mirror shows the change while the call is in flight.

use std::sync::Arc;

use tokio::sync::RwLock;

use lessonbook_core::lesson::{
    add_instrument, remove_instrument, rename_instrument, InstrumentError, Settings,
    UpdateSettingsRequest,
};

use super::{load, optimistic, LessonApi, StoreState};
use crate::error::Result;

/// Local mirror of `/api/settings`.
pub struct SettingsStore<A: LessonApi> {
    api: Arc<A>,
    state: RwLock<StoreState<Settings>>,
}

impl<A: LessonApi> SettingsStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: RwLock::new(StoreState::default()),
        }
    }

    pub async fn snapshot(&self) -> StoreState<Settings> {
        self.state.read().await.clone()
    }

    pub async fn instruments(&self) -> Vec<String> {
        self.state.read().await.data.instruments.clone()
    }

    pub async fn fetch(&self) -> Result<()> {
        load(&self.state, self.api.get_settings()).await
    }

    pub async fn update(&self, request: UpdateSettingsRequest) -> Result<Settings> {
        let local = request.clone();
        optimistic(
            &self.state,
            |settings| local.apply_to(settings),
            self.api.update_settings(&request),
            |settings, stored| *settings = stored.clone(),
        )
        .await
    }

    /// Adds `name`. The local list changes only if the local rules accept
    /// it; the server decides either way.
    pub async fn add_instrument(&self, name: &str) -> Result<Vec<String>> {
        optimistic(
            &self.state,
            |settings| preview(add_instrument(settings, name)),
            self.api.add_instrument(name),
            |settings, stored| settings.instruments = stored.clone(),
        )
        .await
    }

    pub async fn rename_instrument(&self, name: &str, new_name: &str) -> Result<Vec<String>> {
        optimistic(
            &self.state,
            |settings| preview(rename_instrument(settings, name, new_name)),
            self.api.rename_instrument(name, new_name),
            |settings, stored| settings.instruments = stored.clone(),
        )
        .await
    }

    pub async fn remove_instrument(&self, name: &str) -> Result<()> {
        optimistic(
            &self.state,
            |settings| preview(remove_instrument(settings, name)),
            self.api.remove_instrument(name),
            |settings, _| {
                // Already gone unless the mirror was stale
                let _ = remove_instrument(settings, name);
            },
        )
        .await
    }
}

/// Logs an instrument change the local mirror refused. The core operations
/// leave the mirror unchanged on error.
fn preview(result: std::result::Result<(), InstrumentError>) {
    if let Err(err) = result {
        tracing::debug!(error = %err, "Local mirror disagrees, waiting for server");
    }
}
