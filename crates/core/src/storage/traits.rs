use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::lesson::{Note, Settings, Song, SongTeaching, Student};

use super::Result;

/// Repository for students and their embedded notes.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Lists every student.
    async fn list_students(&self) -> Result<Vec<Student>>;

    /// Gets a student by its ID.
    async fn get_student(&self, id: Uuid) -> Result<Option<Student>>;

    /// Creates a new student. Fails with `AlreadyExists` on an ID clash.
    async fn create_student(&self, student: &Student) -> Result<()>;

    /// Replaces an existing student document.
    async fn update_student(&self, student: &Student) -> Result<()>;

    /// Deletes a student by its ID.
    async fn delete_student(&self, id: Uuid) -> Result<()>;

    /// Appends a note to a student and bumps the student's `updatedAt`.
    async fn add_note(&self, student_id: Uuid, note: &Note) -> Result<()>;

    /// Replaces a note, matched by its ID.
    async fn update_note(&self, student_id: Uuid, note: &Note) -> Result<()>;

    /// Removes a note from a student.
    async fn delete_note(&self, student_id: Uuid, note_id: Uuid) -> Result<()>;

    /// Replaces the whole collection.
    async fn replace_students(&self, students: &[Student]) -> Result<()>;
}

/// Repository for the song library.
#[async_trait]
pub trait SongRepository: Send + Sync {
    async fn list_songs(&self) -> Result<Vec<Song>>;

    async fn get_song(&self, id: Uuid) -> Result<Option<Song>>;

    async fn create_song(&self, song: &Song) -> Result<()>;

    async fn update_song(&self, song: &Song) -> Result<()>;

    async fn delete_song(&self, id: Uuid) -> Result<()>;

    /// Increments the song's `frequency` by exactly one and sets
    /// `lastTaught`, as a single atomic step. Returns the updated song.
    async fn record_teaching_on_song(&self, id: Uuid, taught_date: DateTime<Utc>) -> Result<Song>;

    /// Replaces the whole collection.
    async fn replace_songs(&self, songs: &[Song]) -> Result<()>;
}

/// Repository for song teaching records.
#[async_trait]
pub trait TeachingRepository: Send + Sync {
    /// Lists every teaching record, newest `taughtDate` first.
    async fn list_teachings(&self) -> Result<Vec<SongTeaching>>;

    async fn create_teaching(&self, teaching: &SongTeaching) -> Result<()>;

    /// Deletes every record for a student. Returns how many were removed.
    async fn delete_teachings_for_student(&self, student_id: Uuid) -> Result<usize>;

    /// Deletes every record for a song. Returns how many were removed.
    async fn delete_teachings_for_song(&self, song_id: Uuid) -> Result<usize>;

    /// Replaces the whole collection.
    async fn replace_teachings(&self, teachings: &[SongTeaching]) -> Result<()>;
}

/// Repository for the single settings document.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Gets the settings, or defaults when none were ever saved.
    async fn get_settings(&self) -> Result<Settings>;

    /// Saves the settings document, replacing the previous one.
    async fn save_settings(&self, settings: &Settings) -> Result<()>;
}
