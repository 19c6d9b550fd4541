//! Export and import.

use lessonbook_core::lesson::{ExportBundle, ImportBundle, ImportSummary};

use super::LessonbookClient;
use crate::error::Result;

impl LessonbookClient {
    /// Download every collection.
    pub async fn export_data(&self) -> Result<ExportBundle> {
        self.get("/api/export").await
    }

    /// Replace the collections present in `bundle`.
    pub async fn import_data(&self, bundle: &ImportBundle) -> Result<ImportSummary> {
        self.post("/api/import", bundle).await
    }
}
