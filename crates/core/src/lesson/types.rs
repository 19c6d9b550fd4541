use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::serde::{deserialize_lesson_date, deserialize_optional_lesson_date};

/// A student taking regular lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub instrument: String,
    pub grade: String,
    /// Weekday name of the regular lesson, e.g. `Monday`.
    pub day: String,
    /// Lesson start time as `HH:MM`.
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_material: Option<String>,
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Number of lessons attended.
    #[serde(default)]
    pub attendance: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_lesson_date"
    )]
    pub last_active: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Creates a new student with no notes.
    pub fn new(
        name: impl Into<String>,
        instrument: impl Into<String>,
        grade: impl Into<String>,
        day: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            instrument: instrument.into(),
            grade: grade.into(),
            day: day.into(),
            time: time.into(),
            contact: None,
            current_material: None,
            notes: Vec::new(),
            attendance: 0,
            last_active: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID for this student (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the contact details.
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// Sets the material currently being studied.
    pub fn with_current_material(mut self, material: impl Into<String>) -> Self {
        self.current_material = Some(material.into());
        self
    }

    /// Adds a note.
    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    /// Finds a note by ID.
    pub fn note(&self, note_id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == note_id)
    }

    /// Finds a note by ID for modification.
    pub fn note_mut(&mut self, note_id: Uuid) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == note_id)
    }
}

/// A lesson note, embedded in its student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub content: String,
    /// Always ISO-8601 on the wire; legacy `DD/MM/YYYY` is accepted on input.
    #[serde(deserialize_with = "deserialize_lesson_date")]
    pub date: DateTime<Utc>,
}

impl Note {
    /// Creates a note dated now.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            date: Utc::now(),
        }
    }

    /// Sets the note date.
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }
}

/// Root note of a song key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyLetter {
    A,
    B,
    #[default]
    C,
    D,
    E,
    F,
    G,
}

/// Accidental applied to the key letter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyModifier {
    #[default]
    Natural,
    Sharp,
    Flat,
}

/// Major or minor tonality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    #[default]
    Major,
    Minor,
}

impl fmt::Display for KeyLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            KeyLetter::A => "A",
            KeyLetter::B => "B",
            KeyLetter::C => "C",
            KeyLetter::D => "D",
            KeyLetter::E => "E",
            KeyLetter::F => "F",
            KeyLetter::G => "G",
        };
        f.write_str(letter)
    }
}

/// A song in the teaching library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub key_letter: KeyLetter,
    #[serde(default)]
    pub key_modifier: KeyModifier,
    #[serde(default)]
    pub key_mode: KeyMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    /// How many times the song has been taught. Only the teaching record
    /// endpoint changes it.
    #[serde(default)]
    pub frequency: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_lesson_date"
    )]
    pub last_taught: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Song {
    /// Creates a new song in C major that has never been taught.
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            artist: artist.into(),
            key_letter: KeyLetter::default(),
            key_modifier: KeyModifier::default(),
            key_mode: KeyMode::default(),
            bpm: None,
            youtube_url: None,
            frequency: 0,
            last_taught: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID for this song (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the song key.
    pub fn with_key(mut self, letter: KeyLetter, modifier: KeyModifier, mode: KeyMode) -> Self {
        self.key_letter = letter;
        self.key_modifier = modifier;
        self.key_mode = mode;
        self
    }

    /// Sets the tempo.
    pub fn with_bpm(mut self, bpm: u16) -> Self {
        self.bpm = Some(bpm);
        self
    }

    /// Human-readable key, e.g. `F# minor`.
    pub fn key_name(&self) -> String {
        let accidental = match self.key_modifier {
            KeyModifier::Natural => "",
            KeyModifier::Sharp => "#",
            KeyModifier::Flat => "b",
        };
        let mode = match self.key_mode {
            KeyMode::Major => "major",
            KeyMode::Minor => "minor",
        };
        format!("{}{} {}", self.key_letter, accidental, mode)
    }

    /// Records one more teaching of this song on `taught_date`.
    pub fn record_teaching(&mut self, taught_date: DateTime<Utc>) {
        self.frequency += 1;
        self.last_taught = Some(taught_date);
        self.updated_at = Utc::now();
    }
}

/// Join record created each time a song is taught to a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongTeaching {
    pub id: Uuid,
    pub song_id: Uuid,
    pub student_id: Uuid,
    #[serde(deserialize_with = "deserialize_lesson_date")]
    pub taught_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
}

impl SongTeaching {
    /// Creates a teaching record.
    pub fn new(song_id: Uuid, student_id: Uuid, taught_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            song_id,
            student_id,
            taught_date,
            lesson_id: None,
        }
    }
}

/// The settings document.
///
/// `instruments` is the only field the server interprets. Any other
/// top-level keys are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub instruments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// Creates settings with the given instruments.
    pub fn with_instruments<I, S>(instruments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            instruments: instruments.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Returns true if an instrument with this name exists (case-insensitive).
    pub fn has_instrument(&self, name: &str) -> bool {
        self.instruments
            .iter()
            .any(|i| i.eq_ignore_ascii_case(name.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_student_serializes_camel_case() {
        let student = Student::new("Ana", "Guitar", "1", "Monday", "10:00")
            .with_current_material("Book 1");
        let json = serde_json::to_value(&student).unwrap();

        assert_eq!(json["currentMaterial"], "Book 1");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("contact").is_none());
        assert_eq!(json["notes"], serde_json::json!([]));
    }

    #[test]
    fn test_student_missing_optional_fields_default() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Ana",
            "instrument": "Piano",
            "grade": "2",
            "day": "Tuesday",
            "time": "16:30",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let student: Student = serde_json::from_str(json).unwrap();

        assert!(student.notes.is_empty());
        assert_eq!(student.attendance, 0);
        assert_eq!(student.last_active, None);
    }

    #[test]
    fn test_note_accepts_legacy_date_and_writes_iso() {
        let json = r#"{"id": "00000000-0000-0000-0000-000000000002", "content": "Scales", "date": "15/02/2024"}"#;
        let note: Note = serde_json::from_str(json).unwrap();

        assert_eq!(note.date, Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap());

        let out = serde_json::to_value(&note).unwrap();
        assert_eq!(out["date"], "2024-02-15T00:00:00Z");
    }

    #[test]
    fn test_student_note_lookup() {
        let note = Note::new("Work on barre chords");
        let note_id = note.id;
        let mut student = Student::new("Ben", "Guitar", "3", "Friday", "17:00").with_note(note);

        assert!(student.note(note_id).is_some());
        student.note_mut(note_id).unwrap().content = "Done".to_string();
        assert_eq!(student.note(note_id).unwrap().content, "Done");
        assert!(student.note(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_song_key_serialization() {
        let song = Song::new("Wonderwall", "Oasis").with_key(
            KeyLetter::F,
            KeyModifier::Sharp,
            KeyMode::Minor,
        );
        let json = serde_json::to_value(&song).unwrap();

        assert_eq!(json["keyLetter"], "F");
        assert_eq!(json["keyModifier"], "sharp");
        assert_eq!(json["keyMode"], "minor");
        assert_eq!(json["frequency"], 0);
    }

    #[test]
    fn test_song_key_name() {
        let song = Song::new("Tune", "Trad").with_key(KeyLetter::B, KeyModifier::Flat, KeyMode::Major);
        assert_eq!(song.key_name(), "Bb major");
        assert_eq!(Song::new("Tune", "Trad").key_name(), "C major");
    }

    #[test]
    fn test_song_record_teaching_increments_once() {
        let mut song = Song::new("Tune", "Trad");
        song.frequency = 7;
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        song.record_teaching(date);

        assert_eq!(song.frequency, 8);
        assert_eq!(song.last_taught, Some(date));
    }

    #[test]
    fn test_settings_preserves_extra_keys() {
        let json = r#"{"instruments": ["Guitar"], "theme": "dark", "lessonLength": 30}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.instruments, vec!["Guitar"]);
        assert_eq!(settings.extra["theme"], "dark");

        let out = serde_json::to_value(&settings).unwrap();
        assert_eq!(out["lessonLength"], 30);
    }

    #[test]
    fn test_settings_has_instrument_case_insensitive() {
        let settings = Settings::with_instruments(["Guitar", "Piano"]);
        assert!(settings.has_instrument("guitar"));
        assert!(settings.has_instrument(" PIANO "));
        assert!(!settings.has_instrument("Violin"));
    }
}
