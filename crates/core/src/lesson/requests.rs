//! API request types for lesson operations.
//!
//! These types are shared between the server and client for type-safe API
//! communication. They are pure data types with no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::types::{KeyLetter, KeyMode, KeyModifier, Note, Settings, Song, SongTeaching, Student};
use crate::serde::{deserialize_optional_lesson_date, deserialize_optional_string};

/// Request payload for creating a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub name: String,
    pub instrument: String,
    pub grade: String,
    pub day: String,
    pub time: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_string"
    )]
    pub contact: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_string"
    )]
    pub current_material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<u32>,
}

impl CreateStudentRequest {
    /// Create a request with the required fields.
    pub fn new(
        name: impl Into<String>,
        instrument: impl Into<String>,
        grade: impl Into<String>,
        day: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instrument: instrument.into(),
            grade: grade.into(),
            day: day.into(),
            time: time.into(),
            contact: None,
            current_material: None,
            attendance: None,
        }
    }

    /// Convert into a Student with a fresh ID and timestamps.
    pub fn into_student(self) -> Student {
        let mut student = Student::new(self.name, self.instrument, self.grade, self.day, self.time);
        student.contact = self.contact;
        student.current_material = self.current_material;
        student.attendance = self.attendance.unwrap_or(0);
        student
    }
}

/// Request payload for updating a student. Absent fields are left unchanged.
///
/// For `contact` and `currentMaterial`, an empty string clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_lesson_date"
    )]
    pub last_active: Option<DateTime<Utc>>,
}

impl UpdateStudentRequest {
    /// Set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the instrument.
    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instrument = Some(instrument.into());
        self
    }

    /// Applies the update to an existing student and bumps `updated_at`.
    pub fn apply_to(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(instrument) = self.instrument {
            student.instrument = instrument;
        }
        if let Some(grade) = self.grade {
            student.grade = grade;
        }
        if let Some(day) = self.day {
            student.day = day;
        }
        if let Some(time) = self.time {
            student.time = time;
        }
        if let Some(contact) = self.contact {
            student.contact = Some(contact).filter(|c| !c.trim().is_empty());
        }
        if let Some(material) = self.current_material {
            student.current_material = Some(material).filter(|m| !m.trim().is_empty());
        }
        if let Some(attendance) = self.attendance {
            student.attendance = attendance;
        }
        if let Some(last_active) = self.last_active {
            student.last_active = Some(last_active);
        }
        student.updated_at = Utc::now();
    }
}

/// Request payload for adding a note. The date defaults to now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub content: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_lesson_date"
    )]
    pub date: Option<DateTime<Utc>>,
}

impl CreateNoteRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            date: None,
        }
    }

    /// Convert into a Note with a fresh ID.
    pub fn into_note(self) -> Note {
        let note = Note::new(self.content);
        match self.date {
            Some(date) => note.with_date(date),
            None => note,
        }
    }
}

/// Request payload for editing a note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_lesson_date"
    )]
    pub date: Option<DateTime<Utc>>,
}

impl UpdateNoteRequest {
    /// Applies the update to an existing note.
    pub fn apply_to(self, note: &mut Note) {
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(date) = self.date {
            note.date = date;
        }
    }
}

/// Request payload for creating a song.
///
/// There is deliberately no `frequency` field: teach counts start at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSongRequest {
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_letter: Option<KeyLetter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_modifier: Option<KeyModifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_mode: Option<KeyMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u16>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_string"
    )]
    pub youtube_url: Option<String>,
}

impl CreateSongRequest {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            key_letter: None,
            key_modifier: None,
            key_mode: None,
            bpm: None,
            youtube_url: None,
        }
    }

    /// Convert into a Song with a fresh ID.
    pub fn into_song(self) -> Song {
        let mut song = Song::new(self.title, self.artist);
        song.key_letter = self.key_letter.unwrap_or_default();
        song.key_modifier = self.key_modifier.unwrap_or_default();
        song.key_mode = self.key_mode.unwrap_or_default();
        song.bpm = self.bpm;
        song.youtube_url = self.youtube_url;
        song
    }
}

/// Request payload for updating a song. `frequency` and `lastTaught` are
/// not updatable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSongRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_letter: Option<KeyLetter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_modifier: Option<KeyModifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_mode: Option<KeyMode>,
    /// `0` clears the tempo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u16>,
    /// An empty string clears the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
}

impl UpdateSongRequest {
    /// Applies the update to an existing song and bumps `updated_at`.
    pub fn apply_to(self, song: &mut Song) {
        if let Some(title) = self.title {
            song.title = title;
        }
        if let Some(artist) = self.artist {
            song.artist = artist;
        }
        if let Some(letter) = self.key_letter {
            song.key_letter = letter;
        }
        if let Some(modifier) = self.key_modifier {
            song.key_modifier = modifier;
        }
        if let Some(mode) = self.key_mode {
            song.key_mode = mode;
        }
        if let Some(bpm) = self.bpm {
            song.bpm = Some(bpm).filter(|b| *b != 0);
        }
        if let Some(url) = self.youtube_url {
            song.youtube_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        song.updated_at = Utc::now();
    }
}

/// Request payload for recording that a song was taught.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTeachingRequest {
    pub song_id: Uuid,
    pub student_id: Uuid,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_lesson_date"
    )]
    pub taught_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_string"
    )]
    pub lesson_id: Option<String>,
}

impl RecordTeachingRequest {
    pub fn new(song_id: Uuid, student_id: Uuid) -> Self {
        Self {
            song_id,
            student_id,
            taught_date: None,
            lesson_id: None,
        }
    }

    /// Convert into a teaching record, dated now when no date was given.
    pub fn into_teaching(self) -> SongTeaching {
        let mut teaching = SongTeaching::new(
            self.song_id,
            self.student_id,
            self.taught_date.unwrap_or_else(Utc::now),
        );
        teaching.lesson_id = self.lesson_id;
        teaching
    }
}

/// Response of `POST /api/songs/teaching`: the stored record and the song
/// with its new teach count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeachingRecorded {
    pub teaching: SongTeaching,
    pub song: Song,
}

/// Request payload for `PUT /api/settings`.
///
/// `instruments`, when present, replaces the list. Other keys are merged
/// into the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruments: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UpdateSettingsRequest {
    /// Applies the update to the settings document.
    pub fn apply_to(self, settings: &mut Settings) {
        if let Some(instruments) = self.instruments {
            settings.instruments = instruments;
        }
        for (key, value) in self.extra {
            // updatedAt is server-maintained
            if key != "updatedAt" {
                settings.extra.insert(key, value);
            }
        }
        settings.updated_at = Some(Utc::now());
    }
}

/// Request payload naming a single instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentRequest {
    pub name: String,
}
