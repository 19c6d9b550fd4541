//! Settings and instrument API operations.

use lessonbook_core::lesson::{InstrumentRequest, Settings, UpdateSettingsRequest};

use super::LessonbookClient;
use crate::error::Result;

const INSTRUMENTS: &str = "/api/settings/instruments";

impl LessonbookClient {
    /// Get the settings document.
    pub async fn get_settings(&self) -> Result<Settings> {
        self.get("/api/settings").await
    }

    /// Update the settings document.
    pub async fn update_settings(&self, request: &UpdateSettingsRequest) -> Result<Settings> {
        self.put("/api/settings", request).await
    }

    /// List instruments.
    pub async fn list_instruments(&self) -> Result<Vec<String>> {
        self.get(INSTRUMENTS).await
    }

    /// Add an instrument. Returns the updated list.
    pub async fn add_instrument(&self, name: &str) -> Result<Vec<String>> {
        let request = InstrumentRequest {
            name: name.to_string(),
        };
        self.post(INSTRUMENTS, &request).await
    }

    /// Rename an instrument. Returns the updated list.
    pub async fn rename_instrument(&self, name: &str, new_name: &str) -> Result<Vec<String>> {
        let request = InstrumentRequest {
            name: new_name.to_string(),
        };
        let url = self.url_with_segment(INSTRUMENTS, name)?;
        self.mutate(reqwest::Method::PUT, url, Some(&request)).await
    }

    /// Remove an instrument.
    pub async fn remove_instrument(&self, name: &str) -> Result<()> {
        let url = self.url_with_segment(INSTRUMENTS, name)?;
        let _: serde_json::Value = self
            .mutate::<_, (), _>(reqwest::Method::DELETE, url, None)
            .await?;
        Ok(())
    }
}
