//! SQLite schema definitions and SQL query constants.

/// Per-connection settings. WAL lets pooled readers run beside a writer.
pub const CONNECTION_PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;
"#;

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id TEXT PRIMARY KEY,
    doc TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS songs (
    id TEXT PRIMARY KEY,
    doc TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS song_teachings (
    id TEXT PRIMARY KEY,
    song_id TEXT NOT NULL,
    student_id TEXT NOT NULL,
    taught_date TEXT NOT NULL,
    doc TEXT NOT NULL
);

-- Single-row table holding the settings document
CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    doc TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_song_teachings_song_id ON song_teachings(song_id);
CREATE INDEX IF NOT EXISTS idx_song_teachings_student_id ON song_teachings(student_id);
"#;

// Student queries
pub const SELECT_STUDENTS: &str = "SELECT doc FROM students";
pub const SELECT_STUDENT_BY_ID: &str = "SELECT doc FROM students WHERE id = ?1";
pub const INSERT_STUDENT: &str = "INSERT INTO students (id, doc) VALUES (?1, ?2)";
pub const UPDATE_STUDENT: &str = "UPDATE students SET doc = ?2 WHERE id = ?1";
pub const DELETE_STUDENT: &str = "DELETE FROM students WHERE id = ?1";
pub const DELETE_ALL_STUDENTS: &str = "DELETE FROM students";

// Song queries
pub const SELECT_SONGS: &str = "SELECT doc FROM songs";
pub const SELECT_SONG_BY_ID: &str = "SELECT doc FROM songs WHERE id = ?1";
pub const INSERT_SONG: &str = "INSERT INTO songs (id, doc) VALUES (?1, ?2)";
pub const UPDATE_SONG: &str = "UPDATE songs SET doc = ?2 WHERE id = ?1";
pub const DELETE_SONG: &str = "DELETE FROM songs WHERE id = ?1";
pub const DELETE_ALL_SONGS: &str = "DELETE FROM songs";

// Teaching queries
pub const SELECT_TEACHINGS: &str =
    "SELECT doc FROM song_teachings ORDER BY taught_date DESC";
pub const INSERT_TEACHING: &str = r#"
INSERT INTO song_teachings (id, song_id, student_id, taught_date, doc)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;
pub const DELETE_TEACHINGS_BY_STUDENT: &str = "DELETE FROM song_teachings WHERE student_id = ?1";
pub const DELETE_TEACHINGS_BY_SONG: &str = "DELETE FROM song_teachings WHERE song_id = ?1";
pub const DELETE_ALL_TEACHINGS: &str = "DELETE FROM song_teachings";

// Settings queries
pub const SELECT_SETTINGS: &str = "SELECT doc FROM settings WHERE id = 1";
pub const UPSERT_SETTINGS: &str = r#"
INSERT INTO settings (id, doc) VALUES (1, ?1)
ON CONFLICT(id) DO UPDATE SET doc = excluded.doc
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_valid_sql() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_TABLES).unwrap();

        // Idempotent
        conn.execute_batch(CREATE_TABLES).unwrap();
    }

    #[test]
    fn test_settings_table_holds_one_row() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_TABLES).unwrap();

        conn.execute(UPSERT_SETTINGS, ["{}"]).unwrap();
        conn.execute(UPSERT_SETTINGS, [r#"{"instruments":[]}"#]).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
