use chrono::NaiveTime;

use super::days::normalize_day;
use super::error::{InstrumentError, ValidationErrors};
use super::types::{Note, Settings, Song, Student};

const MAX_NAME_LEN: usize = 100;
const MAX_BPM: u16 = 400;

/// Validates a student and normalizes its `day` and `time` in place.
///
/// `day` becomes its canonical weekday name and `time` is rewritten as
/// zero-padded `HH:MM`. Every failing field is reported, not just the first.
pub fn prepare_student(student: &mut Student) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = student.name.trim();
    if name.is_empty() {
        errors.add("name", "is required");
    } else if name.len() > MAX_NAME_LEN {
        errors.add("name", "must be at most 100 characters");
    }
    if student.instrument.trim().is_empty() {
        errors.add("instrument", "is required");
    }
    if student.grade.trim().is_empty() {
        errors.add("grade", "is required");
    }

    match normalize_day(&student.day) {
        Some(day) => student.day = day.to_string(),
        None => errors.add("day", format!("unknown weekday: {}", student.day)),
    }

    match NaiveTime::parse_from_str(student.time.trim(), "%H:%M") {
        Ok(time) => student.time = time.format("%H:%M").to_string(),
        Err(_) => errors.add("time", "must be HH:MM"),
    }

    let mut seen = std::collections::HashSet::new();
    for (index, note) in student.notes.iter().enumerate() {
        if !seen.insert(note.id) {
            errors.add(format!("notes[{index}].id"), "duplicate note id");
        }
        if let Err(note_errors) = validate_note(note) {
            errors.merge_prefixed(&format!("notes[{index}]"), note_errors);
        }
    }

    if errors.is_empty() {
        student.name = student.name.trim().to_string();
    }
    errors.into_result()
}

/// Validates a note.
pub fn validate_note(note: &Note) -> Result<(), ValidationErrors> {
    if note.content.trim().is_empty() {
        return Err(ValidationErrors::single("content", "is required"));
    }
    Ok(())
}

/// Validates a song before creation or update.
pub fn validate_song(song: &Song) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if song.title.trim().is_empty() {
        errors.add("title", "is required");
    }
    if song.artist.trim().is_empty() {
        errors.add("artist", "is required");
    }
    if let Some(bpm) = song.bpm {
        if bpm == 0 || bpm > MAX_BPM {
            errors.add("bpm", "must be between 1 and 400");
        }
    }
    if let Some(url) = &song.youtube_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.add("youtubeUrl", "must be an http(s) URL");
        }
    }

    errors.into_result()
}

/// Sorts students by name, case-insensitively.
pub fn sort_students_by_name(students: &mut [Student]) {
    students.sort_by_key(|s| s.name.to_lowercase());
}

/// Sorts songs by title, case-insensitively.
pub fn sort_songs_by_title(songs: &mut [Song]) {
    songs.sort_by_key(|s| s.title.to_lowercase());
}

/// Adds an instrument, rejecting blanks and case-insensitive duplicates.
pub fn add_instrument(settings: &mut Settings, name: &str) -> Result<(), InstrumentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InstrumentError::EmptyName);
    }
    if settings.has_instrument(name) {
        return Err(InstrumentError::Duplicate(name.to_string()));
    }
    settings.instruments.push(name.to_string());
    Ok(())
}

/// Renames an instrument in place, keeping its position in the list.
pub fn rename_instrument(
    settings: &mut Settings,
    old_name: &str,
    new_name: &str,
) -> Result<(), InstrumentError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(InstrumentError::EmptyName);
    }

    let index = position(settings, old_name)
        .ok_or_else(|| InstrumentError::NotFound(old_name.to_string()))?;

    // Renaming to a different case of itself is allowed
    let clashes = settings
        .instruments
        .iter()
        .enumerate()
        .any(|(i, existing)| i != index && existing.eq_ignore_ascii_case(new_name));
    if clashes {
        return Err(InstrumentError::Duplicate(new_name.to_string()));
    }

    settings.instruments[index] = new_name.to_string();
    Ok(())
}

/// Removes an instrument by name (case-insensitive).
pub fn remove_instrument(settings: &mut Settings, name: &str) -> Result<(), InstrumentError> {
    let index =
        position(settings, name).ok_or_else(|| InstrumentError::NotFound(name.to_string()))?;
    settings.instruments.remove(index);
    Ok(())
}

fn position(settings: &Settings, name: &str) -> Option<usize> {
    let name = name.trim();
    settings
        .instruments
        .iter()
        .position(|i| i.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(day: &str, time: &str) -> Student {
        Student::new("Ana", "Guitar", "1", day, time)
    }

    #[test]
    fn test_prepare_student_normalizes_day_and_time() {
        let mut s = student("mon", "9:05");
        prepare_student(&mut s).unwrap();

        assert_eq!(s.day, "Monday");
        assert_eq!(s.time, "09:05");
    }

    #[test]
    fn test_prepare_student_reports_every_field() {
        let mut s = Student::new("  ", "", "1", "Someday", "25:00");
        let errors = prepare_student(&mut s).unwrap_err();

        let fields: Vec<_> = errors.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "instrument", "day", "time"]);
    }

    #[test]
    fn test_prepare_student_rejects_duplicate_note_ids() {
        let note = Note::new("Scales");
        let mut s = student("Monday", "10:00")
            .with_note(note.clone())
            .with_note(note);

        let errors = prepare_student(&mut s).unwrap_err();
        assert_eq!(errors.errors[0].field, "notes[1].id");
    }

    #[test]
    fn test_validate_note_empty_content() {
        assert!(validate_note(&Note::new("  ")).is_err());
        assert!(validate_note(&Note::new("Scales")).is_ok());
    }

    #[test]
    fn test_validate_song() {
        assert!(validate_song(&Song::new("Tune", "Trad").with_bpm(120)).is_ok());
        assert!(validate_song(&Song::new("", "Trad")).is_err());

        let errors = validate_song(&Song::new("Tune", "Trad").with_bpm(0)).unwrap_err();
        assert_eq!(errors.errors[0].field, "bpm");

        let mut song = Song::new("Tune", "Trad");
        song.youtube_url = Some("youtube.com/watch".to_string());
        assert!(validate_song(&song).is_err());
    }

    #[test]
    fn test_sort_students_by_name() {
        let mut students = vec![
            Student::new("carla", "Piano", "1", "Monday", "10:00"),
            Student::new("Ben", "Piano", "1", "Monday", "10:00"),
            Student::new("ana", "Piano", "1", "Monday", "10:00"),
        ];
        sort_students_by_name(&mut students);

        let names: Vec<_> = students.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ana", "Ben", "carla"]);
    }

    #[test]
    fn test_add_instrument_rejects_duplicates() {
        let mut settings = Settings::with_instruments(["Guitar"]);

        assert_eq!(
            add_instrument(&mut settings, "guitar"),
            Err(InstrumentError::Duplicate("guitar".to_string()))
        );
        assert_eq!(add_instrument(&mut settings, " "), Err(InstrumentError::EmptyName));

        add_instrument(&mut settings, " Piano ").unwrap();
        assert_eq!(settings.instruments, vec!["Guitar", "Piano"]);
    }

    #[test]
    fn test_rename_instrument() {
        let mut settings = Settings::with_instruments(["Guitar", "Piano"]);

        rename_instrument(&mut settings, "guitar", "Electric Guitar").unwrap();
        assert_eq!(settings.instruments, vec!["Electric Guitar", "Piano"]);

        assert_eq!(
            rename_instrument(&mut settings, "Piano", "electric guitar"),
            Err(InstrumentError::Duplicate("electric guitar".to_string()))
        );
        assert_eq!(
            rename_instrument(&mut settings, "Violin", "Viola"),
            Err(InstrumentError::NotFound("Violin".to_string()))
        );

        rename_instrument(&mut settings, "Piano", "PIANO").unwrap();
        assert_eq!(settings.instruments[1], "PIANO");
    }

    #[test]
    fn test_remove_instrument() {
        let mut settings = Settings::with_instruments(["Guitar", "Piano"]);

        remove_instrument(&mut settings, "GUITAR").unwrap();
        assert_eq!(settings.instruments, vec!["Piano"]);
        assert!(remove_instrument(&mut settings, "Guitar").is_err());
    }
}
