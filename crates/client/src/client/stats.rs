//! Dashboard statistics.

use lessonbook_core::lesson::DashboardStats;

use super::LessonbookClient;
use crate::error::Result;

impl LessonbookClient {
    /// Get the dashboard statistics.
    pub async fn get_stats(&self) -> Result<DashboardStats> {
        self.get("/api/stats").await
    }
}
