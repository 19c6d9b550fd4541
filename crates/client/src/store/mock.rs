//! In-process `LessonApi` used by the store tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use lessonbook_core::lesson::{
    add_instrument, remove_instrument, rename_instrument, CreateNoteRequest, CreateSongRequest,
    CreateStudentRequest, InstrumentError, Note, RecordTeachingRequest, Settings, Song, Student, TeachingRecorded,
    UpdateNoteRequest, UpdateSettingsRequest, UpdateSongRequest, UpdateStudentRequest,
};

use lessonbook_core::storage::instrument_error_to_status_code;

use super::LessonApi;
use crate::error::{ClientError, Result};

#[derive(Debug, Default)]
pub(crate) struct MockApi {
    pub students: Mutex<Vec<Student>>,
    pub songs: Mutex<Vec<Song>>,
    pub settings: Mutex<Settings>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockApi {
    /// Makes every following call fail with a 500 carrying `Server exploded`.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 500,
                message: "Server exploded".to_string(),
            });
        }
        Ok(())
    }

    fn with_student<T>(&self, id: Uuid, f: impl FnOnce(&mut Student) -> Result<T>) -> Result<T> {
        let mut students = self.students.lock().unwrap();
        let student = students
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(not_found)?;
        f(student)
    }
}

/// The error envelope the server sends for a rejected instrument change.
fn rejected(err: InstrumentError) -> ClientError {
    ClientError::Api {
        status: instrument_error_to_status_code(&err),
        message: err.to_string(),
    }
}

fn not_found() -> ClientError {
    ClientError::Api {
        status: 404,
        message: "Not found".to_string(),
    }
}

#[async_trait]
impl LessonApi for MockApi {
    async fn list_students(&self) -> Result<Vec<Student>> {
        self.check()?;
        Ok(self.students.lock().unwrap().clone())
    }

    async fn create_student(&self, request: &CreateStudentRequest) -> Result<Student> {
        self.check()?;
        let student = request.clone().into_student();
        self.students.lock().unwrap().push(student.clone());
        Ok(student)
    }

    async fn update_student(&self, id: Uuid, request: &UpdateStudentRequest) -> Result<Student> {
        self.check()?;
        self.with_student(id, |student| {
            request.clone().apply_to(student);
            Ok(student.clone())
        })
    }

    async fn delete_student(&self, id: Uuid) -> Result<()> {
        self.check()?;
        self.students.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }

    async fn create_note(&self, student_id: Uuid, request: &CreateNoteRequest) -> Result<Note> {
        self.check()?;
        self.with_student(student_id, |student| {
            let note = request.clone().into_note();
            student.notes.push(note.clone());
            Ok(note)
        })
    }

    async fn update_note(
        &self,
        student_id: Uuid,
        note_id: Uuid,
        request: &UpdateNoteRequest,
    ) -> Result<Note> {
        self.check()?;
        self.with_student(student_id, |student| {
            let note = student.note_mut(note_id).ok_or_else(not_found)?;
            request.clone().apply_to(note);
            Ok(note.clone())
        })
    }

    async fn delete_note(&self, student_id: Uuid, note_id: Uuid) -> Result<()> {
        self.check()?;
        self.with_student(student_id, |student| {
            student.notes.retain(|n| n.id != note_id);
            Ok(())
        })
    }

    async fn list_songs(&self) -> Result<Vec<Song>> {
        self.check()?;
        Ok(self.songs.lock().unwrap().clone())
    }

    async fn create_song(&self, request: &CreateSongRequest) -> Result<Song> {
        self.check()?;
        let song = request.clone().into_song();
        self.songs.lock().unwrap().push(song.clone());
        Ok(song)
    }

    async fn update_song(&self, id: Uuid, request: &UpdateSongRequest) -> Result<Song> {
        self.check()?;
        let mut songs = self.songs.lock().unwrap();
        let song = songs.iter_mut().find(|s| s.id == id).ok_or_else(not_found)?;
        request.clone().apply_to(song);
        Ok(song.clone())
    }

    async fn delete_song(&self, id: Uuid) -> Result<()> {
        self.check()?;
        self.songs.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }

    async fn record_teaching(&self, request: &RecordTeachingRequest) -> Result<TeachingRecorded> {
        self.check()?;
        let teaching = request.clone().into_teaching();
        let mut songs = self.songs.lock().unwrap();
        let song = songs
            .iter_mut()
            .find(|s| s.id == teaching.song_id)
            .ok_or_else(not_found)?;
        song.frequency += 1;
        song.last_taught = Some(teaching.taught_date);
        Ok(TeachingRecorded {
            song: song.clone(),
            teaching,
        })
    }

    async fn get_settings(&self) -> Result<Settings> {
        self.check()?;
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn update_settings(&self, request: &UpdateSettingsRequest) -> Result<Settings> {
        self.check()?;
        let mut settings = self.settings.lock().unwrap();
        request.clone().apply_to(&mut settings);
        Ok(settings.clone())
    }

    async fn add_instrument(&self, name: &str) -> Result<Vec<String>> {
        self.check()?;
        let mut settings = self.settings.lock().unwrap();
        add_instrument(&mut settings, name).map_err(rejected)?;
        Ok(settings.instruments.clone())
    }

    async fn rename_instrument(&self, name: &str, new_name: &str) -> Result<Vec<String>> {
        self.check()?;
        let mut settings = self.settings.lock().unwrap();
        rename_instrument(&mut settings, name, new_name).map_err(rejected)?;
        Ok(settings.instruments.clone())
    }

    async fn remove_instrument(&self, name: &str) -> Result<()> {
        self.check()?;
        let mut settings = self.settings.lock().unwrap();
        remove_instrument(&mut settings, name).map_err(rejected)?;
        Ok(())
    }
}
