//! Client-side mirrors of server data.
//!
//! Each store keeps a snapshot of one resource, a `loading` flag and an
//! `error` slot. Mutations are optimistic: the change is applied locally,
//! the call is issued, and the local value is either replaced by the
//! server's answer or rolled back to the snapshot taken before the change.

mod api;
mod settings;
mod songs;
mod students;
mod ui;

use std::future::Future;

use tokio::sync::RwLock;

use crate::error::Result;

pub use api::LessonApi;
pub use settings::SettingsStore;
pub use songs::SongStore;
pub use students::StudentStore;
pub use ui::{Panel, UiStore};

/// Snapshot held by a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState<T> {
    pub data: T,
    pub loading: bool,
    pub error: Option<String>,
}

/// Replaces the whole snapshot with the result of `call`.
///
/// On failure the previous data is kept and the error slot is set.
pub(crate) async fn load<T, F>(state: &RwLock<StoreState<T>>, call: F) -> Result<()>
where
    F: Future<Output = Result<T>>,
{
    {
        let mut guard = state.write().await;
        guard.loading = true;
        guard.error = None;
    }

    let result = call.await;

    let mut guard = state.write().await;
    guard.loading = false;
    match result {
        Ok(data) => {
            guard.data = data;
            Ok(())
        }
        Err(err) => {
            tracing::warn!(error = %err, "Failed to load store");
            guard.error = Some(err.user_message());
            Err(err)
        }
    }
}

/// Applies `apply` locally, awaits `call`, then either `commit`s the
/// server's answer or restores the snapshot taken before `apply`.
///
/// The lock is never held across the network call.
pub(crate) async fn optimistic<T, R, A, F, C>(
    state: &RwLock<StoreState<T>>,
    apply: A,
    call: F,
    commit: C,
) -> Result<R>
where
    T: Clone,
    A: FnOnce(&mut T),
    F: Future<Output = Result<R>>,
    C: FnOnce(&mut T, &R),
{
    let snapshot = {
        let mut guard = state.write().await;
        let snapshot = guard.data.clone();
        apply(&mut guard.data);
        guard.error = None;
        snapshot
    };

    let result = call.await;

    let mut guard = state.write().await;
    match result {
        Ok(value) => {
            commit(&mut guard.data, &value);
            Ok(value)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Rolling back optimistic update");
            guard.data = snapshot;
            guard.error = Some(err.user_message());
            Err(err)
        }
    }
}

#[cfg(test)]
pub(crate) mod mock;
