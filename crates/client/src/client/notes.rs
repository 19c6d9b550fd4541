//! Lesson note API operations.

use uuid::Uuid;

use lessonbook_core::lesson::{CreateNoteRequest, Note, UpdateNoteRequest};

use super::LessonbookClient;
use crate::error::Result;

impl LessonbookClient {
    /// List a student's notes.
    pub async fn list_notes(&self, student_id: Uuid) -> Result<Vec<Note>> {
        self.get(&format!("/api/students/{student_id}/notes")).await
    }

    /// Get one note.
    pub async fn get_note(&self, student_id: Uuid, note_id: Uuid) -> Result<Note> {
        self.get(&format!("/api/students/{student_id}/notes/{note_id}"))
            .await
    }

    /// Add a note to a student.
    pub async fn create_note(&self, student_id: Uuid, request: &CreateNoteRequest) -> Result<Note> {
        self.post(&format!("/api/students/{student_id}/notes"), request)
            .await
    }

    /// Edit a note.
    pub async fn update_note(
        &self,
        student_id: Uuid,
        note_id: Uuid,
        request: &UpdateNoteRequest,
    ) -> Result<Note> {
        self.put(
            &format!("/api/students/{student_id}/notes/{note_id}"),
            request,
        )
        .await
    }

    /// Delete a note.
    pub async fn delete_note(&self, student_id: Uuid, note_id: Uuid) -> Result<()> {
        self.delete(&format!("/api/students/{student_id}/notes/{note_id}"))
            .await
    }
}
