use uuid::Uuid;

/// Cache key for the full student collection.
pub const STUDENTS_KEY: &str = "students";

/// Cache key for the full song collection.
pub const SONGS_KEY: &str = "songs";

/// Cache key for the settings document.
pub const SETTINGS_KEY: &str = "settings";

/// Returns the cache key for the student collection.
pub fn students_key() -> String {
    STUDENTS_KEY.to_string()
}

/// Returns the cache key for a single student.
pub fn student_key(student_id: Uuid) -> String {
    format!("student:{}", student_id)
}

/// Returns the invalidation pattern matching every cached student.
pub fn student_pattern() -> String {
    "^student:".to_string()
}

/// Returns the cache key for the song collection.
pub fn songs_key() -> String {
    SONGS_KEY.to_string()
}

/// Returns the cache key for a single song.
pub fn song_key(song_id: Uuid) -> String {
    format!("song:{}", song_id)
}

/// Returns the invalidation pattern matching every cached song.
pub fn song_pattern() -> String {
    "^song:".to_string()
}

/// Returns the cache key for the settings document.
pub fn settings_key() -> String {
    SETTINGS_KEY.to_string()
}
