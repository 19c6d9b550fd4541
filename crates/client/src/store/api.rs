//! The server operations the stores depend on.

use async_trait::async_trait;
use uuid::Uuid;

use lessonbook_core::lesson::{
    CreateNoteRequest, CreateSongRequest, CreateStudentRequest, Note, RecordTeachingRequest,
    Settings, Song, Student, TeachingRecorded, UpdateNoteRequest, UpdateSettingsRequest,
    UpdateSongRequest, UpdateStudentRequest,
};

use crate::client::LessonbookClient;
use crate::error::Result;

/// Lesson API as seen by the stores.
#[async_trait]
pub trait LessonApi: Send + Sync {
    async fn list_students(&self) -> Result<Vec<Student>>;
    async fn create_student(&self, request: &CreateStudentRequest) -> Result<Student>;
    async fn update_student(&self, id: Uuid, request: &UpdateStudentRequest) -> Result<Student>;
    async fn delete_student(&self, id: Uuid) -> Result<()>;

    async fn create_note(&self, student_id: Uuid, request: &CreateNoteRequest) -> Result<Note>;
    async fn update_note(
        &self,
        student_id: Uuid,
        note_id: Uuid,
        request: &UpdateNoteRequest,
    ) -> Result<Note>;
    async fn delete_note(&self, student_id: Uuid, note_id: Uuid) -> Result<()>;

    async fn list_songs(&self) -> Result<Vec<Song>>;
    async fn create_song(&self, request: &CreateSongRequest) -> Result<Song>;
    async fn update_song(&self, id: Uuid, request: &UpdateSongRequest) -> Result<Song>;
    async fn delete_song(&self, id: Uuid) -> Result<()>;
    async fn record_teaching(&self, request: &RecordTeachingRequest) -> Result<TeachingRecorded>;

    async fn get_settings(&self) -> Result<Settings>;
    async fn update_settings(&self, request: &UpdateSettingsRequest) -> Result<Settings>;
    async fn add_instrument(&self, name: &str) -> Result<Vec<String>>;
    async fn rename_instrument(&self, name: &str, new_name: &str) -> Result<Vec<String>>;
    async fn remove_instrument(&self, name: &str) -> Result<()>;
}

#[async_trait]
impl LessonApi for LessonbookClient {
    async fn list_students(&self) -> Result<Vec<Student>> {
        LessonbookClient::list_students(self).await
    }

    async fn create_student(&self, request: &CreateStudentRequest) -> Result<Student> {
        LessonbookClient::create_student(self, request).await
    }

    async fn update_student(&self, id: Uuid, request: &UpdateStudentRequest) -> Result<Student> {
        LessonbookClient::update_student(self, id, request).await
    }

    async fn delete_student(&self, id: Uuid) -> Result<()> {
        LessonbookClient::delete_student(self, id).await
    }

    async fn create_note(&self, student_id: Uuid, request: &CreateNoteRequest) -> Result<Note> {
        LessonbookClient::create_note(self, student_id, request).await
    }

    async fn update_note(
        &self,
        student_id: Uuid,
        note_id: Uuid,
        request: &UpdateNoteRequest,
    ) -> Result<Note> {
        LessonbookClient::update_note(self, student_id, note_id, request).await
    }

    async fn delete_note(&self, student_id: Uuid, note_id: Uuid) -> Result<()> {
        LessonbookClient::delete_note(self, student_id, note_id).await
    }

    async fn list_songs(&self) -> Result<Vec<Song>> {
        LessonbookClient::list_songs(self).await
    }

    async fn create_song(&self, request: &CreateSongRequest) -> Result<Song> {
        LessonbookClient::create_song(self, request).await
    }

    async fn update_song(&self, id: Uuid, request: &UpdateSongRequest) -> Result<Song> {
        LessonbookClient::update_song(self, id, request).await
    }

    async fn delete_song(&self, id: Uuid) -> Result<()> {
        LessonbookClient::delete_song(self, id).await
    }

    async fn record_teaching(&self, request: &RecordTeachingRequest) -> Result<TeachingRecorded> {
        LessonbookClient::record_teaching(self, request).await
    }

    async fn get_settings(&self) -> Result<Settings> {
        LessonbookClient::get_settings(self).await
    }

    async fn update_settings(&self, request: &UpdateSettingsRequest) -> Result<Settings> {
        LessonbookClient::update_settings(self, request).await
    }

    async fn add_instrument(&self, name: &str) -> Result<Vec<String>> {
        LessonbookClient::add_instrument(self, name).await
    }

    async fn rename_instrument(&self, name: &str, new_name: &str) -> Result<Vec<String>> {
        LessonbookClient::rename_instrument(self, name, new_name).await
    }

    async fn remove_instrument(&self, name: &str) -> Result<()> {
        LessonbookClient::remove_instrument(self, name).await
    }
}
