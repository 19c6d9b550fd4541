//! Pretty output formatting.

use lessonbook_core::lesson::{
    DashboardStats, GroupCount, ImportSummary, Note, Settings, Song, SongTeaching, Student,
};

const RULE_WIDTH: usize = 40;

/// Format a list under a `TITLE (n)` header, or `empty` when there is nothing.
fn format_list<T>(title: &str, empty: &str, items: &[T], format: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    let mut output = format!("{} ({})\n", title, items.len());
    output.push_str(&"-".repeat(RULE_WIDTH));
    for item in items {
        output.push_str(&format!("\n{}", format(item)));
        output.push('\n');
    }
    output
}

/// Format a student for display.
pub fn format_student(student: &Student) -> String {
    let mut output = format!(
        "{} ({}, grade {})\n  ID: {}\n  Lesson: {} {}",
        student.name, student.instrument, student.grade, student.id, student.day, student.time
    );
    if let Some(contact) = &student.contact {
        output.push_str(&format!("\n  Contact: {}", contact));
    }
    if let Some(material) = &student.current_material {
        output.push_str(&format!("\n  Material: {}", material));
    }
    if !student.notes.is_empty() {
        output.push_str(&format!("\n  Notes: {}", student.notes.len()));
    }
    output
}

/// Format students for display.
pub fn format_students(students: &[Student]) -> String {
    format_list("STUDENTS", "No students found.", students, format_student)
}

/// Format a note for display.
pub fn format_note(note: &Note) -> String {
    format!(
        "{}\n  ID: {}\n  {}",
        note.date.format("%Y-%m-%d"),
        note.id,
        note.content
    )
}

/// Format notes for display.
pub fn format_notes(notes: &[Note]) -> String {
    format_list("NOTES", "No notes found.", notes, format_note)
}

/// Format a song for display.
pub fn format_song(song: &Song) -> String {
    let mut output = format!(
        "{} - {}\n  ID: {}\n  Key: {}\n  Taught: {} time(s)",
        song.title,
        song.artist,
        song.id,
        song.key_name(),
        song.frequency
    );
    if let Some(bpm) = song.bpm {
        output.push_str(&format!("\n  BPM: {}", bpm));
    }
    if let Some(last) = song.last_taught {
        output.push_str(&format!("\n  Last taught: {}", last.format("%Y-%m-%d")));
    }
    if let Some(url) = &song.youtube_url {
        output.push_str(&format!("\n  Video: {}", url));
    }
    output
}

/// Format songs for display.
pub fn format_songs(songs: &[Song]) -> String {
    format_list("SONGS", "No songs found.", songs, format_song)
}

/// Format a teaching record for display.
pub fn format_teaching(teaching: &SongTeaching) -> String {
    format!(
        "{}\n  ID: {}\n  Song: {}\n  Student: {}",
        teaching.taught_date.format("%Y-%m-%d"),
        teaching.id,
        teaching.song_id,
        teaching.student_id
    )
}

/// Format teaching records for display.
pub fn format_teachings(teachings: &[SongTeaching]) -> String {
    format_list(
        "TEACHINGS",
        "No teaching records found.",
        teachings,
        format_teaching,
    )
}

/// Format the instrument list for display.
pub fn format_instruments(instruments: &[String]) -> String {
    format_list(
        "INSTRUMENTS",
        "No instruments configured.",
        instruments,
        |name| format!("  {}", name),
    )
}

/// Format the settings document for display.
pub fn format_settings(settings: &Settings) -> String {
    let mut output = format_instruments(&settings.instruments);
    for (key, value) in &settings.extra {
        output.push_str(&format!("\n{}: {}", key, value));
    }
    output
}

fn format_groups(title: &str, groups: &[GroupCount]) -> String {
    let mut output = format!("{}:", title);
    for group in groups {
        output.push_str(&format!("\n  {:<16} {}", group.id, group.count));
    }
    output
}

/// Format dashboard statistics for display.
pub fn format_stats(stats: &DashboardStats) -> String {
    let counts = &stats.counts;
    let mut output = format!(
        "TODAY: {}\n{}\n  Students: {} ({} today)\n  Songs: {}\n  Teachings: {}",
        stats.today,
        "-".repeat(RULE_WIDTH),
        counts.students,
        counts.students_today,
        counts.songs,
        counts.teachings
    );
    output.push_str(&format!(
        "\n{}",
        format_groups("Instruments", &stats.distributions.instruments)
    ));
    output.push_str(&format!(
        "\n{}",
        format_groups("Days", &stats.distributions.days)
    ));
    if !stats.recent_students.is_empty() {
        output.push_str("\nRecently updated:");
        for student in &stats.recent_students {
            output.push_str(&format!("\n  {}", student.name));
        }
    }
    output
}

/// Format an import summary for display.
pub fn format_import_summary(summary: &ImportSummary) -> String {
    let rows = [
        ("students", summary.students),
        ("songs", summary.songs),
        ("songTeachings", summary.song_teachings),
        ("settings", summary.settings),
    ];
    let mut output = "Imported:".to_string();
    for (name, count) in rows {
        if let Some(count) = count {
            output.push_str(&format!("\n  {}: {}", name, count));
        }
    }
    output
}
