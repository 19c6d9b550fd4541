//! SQLite repository implementation.
//!
//! Implements the repository traits from `lessonbook_core::storage` over
//! JSON document tables.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{OptionalExtension, TransactionBehavior};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use lessonbook_core::lesson::{Note, Settings, Song, SongTeaching, Student};
use lessonbook_core::storage::{
    RepositoryError, Result, SettingsRepository, SongRepository, StudentRepository,
    TeachingRepository,
};

use super::error::{domain_err, json_err, map_tokio_rusqlite_error, wrap_err};
use super::pool::{ConnectionPool, RetryPolicy};
use super::schema;

/// SQLite-based repository implementation.
pub struct SqliteRepository {
    pool: ConnectionPool,
}

impl SqliteRepository {
    /// Opens a pooled repository over a database file, creating the file and
    /// schema if needed.
    pub async fn new(path: &str, pool_size: usize, policy: RetryPolicy) -> Result<Self> {
        let pool = ConnectionPool::open(path, pool_size, policy).await?;
        Ok(Self { pool })
    }

    /// Creates a repository over a private in-memory database.
    ///
    /// Useful for testing - data is lost when the repository is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let pool = ConnectionPool::open_in_memory().await?;
        Ok(Self { pool })
    }

    async fn load_all<T>(&self, sql: &'static str, entity_type: &'static str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let docs = self
            .pool
            .get()
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map([], |row| row.get::<_, String>(0))
                    .map_err(wrap_err)?;

                let mut docs = Vec::new();
                for row in rows {
                    docs.push(row.map_err(wrap_err)?);
                }
                Ok(docs)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type, "unknown"))?;

        docs.iter()
            .map(|doc| serde_json::from_str(doc).map_err(RepositoryError::from))
            .collect()
    }

    async fn load_one<T>(
        &self,
        sql: &'static str,
        entity_type: &'static str,
        id: Uuid,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let id_str = id.to_string();
        let doc = self
            .pool
            .get()
            .call(move |conn| {
                conn.query_row(sql, [&id_str], |row| row.get::<_, String>(0))
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type, id.to_string()))?;

        doc.map(|doc| serde_json::from_str(&doc).map_err(RepositoryError::from))
            .transpose()
    }

    /// Runs a statement with `(id, doc)` parameters. Zero affected rows is
    /// reported as `NotFound`.
    async fn write_doc(
        &self,
        sql: &'static str,
        entity_type: &'static str,
        id: Uuid,
        doc: String,
    ) -> Result<()> {
        let id_str = id.to_string();
        self.pool
            .get()
            .call(move |conn| {
                let rows = conn
                    .execute(sql, rusqlite::params![id_str, doc])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type, id.to_string()))
    }

    async fn delete_by(
        &self,
        sql: &'static str,
        entity_type: &'static str,
        id: Uuid,
    ) -> Result<usize> {
        let id_str = id.to_string();
        self.pool
            .get()
            .call(move |conn| conn.execute(sql, [&id_str]).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type, id.to_string()))
    }

    /// Replaces a collection inside one transaction.
    async fn replace_all(
        &self,
        delete_sql: &'static str,
        insert_sql: &'static str,
        entity_type: &'static str,
        rows: Vec<Vec<String>>,
    ) -> Result<()> {
        self.pool
            .get()
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                tx.execute(delete_sql, []).map_err(wrap_err)?;
                {
                    let mut stmt = tx.prepare(insert_sql).map_err(wrap_err)?;
                    for params in &rows {
                        stmt.execute(rusqlite::params_from_iter(params.iter()))
                            .map_err(wrap_err)?;
                    }
                }
                tx.commit().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type, "unknown"))
    }

    /// Loads a student, applies `f`, and writes it back in one immediate
    /// transaction so concurrent note edits serialize.
    async fn modify_student<F>(&self, student_id: Uuid, f: F) -> Result<()>
    where
        F: FnOnce(&mut Student) -> Result<()> + Send + 'static,
    {
        let id_str = student_id.to_string();
        self.pool
            .get()
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;

                let doc: String = tx
                    .query_row(schema::SELECT_STUDENT_BY_ID, [&id_str], |row| row.get(0))
                    .optional()
                    .map_err(wrap_err)?
                    .ok_or_else(|| domain_err(RepositoryError::student_not_found(&id_str)))?;

                let mut student: Student = serde_json::from_str(&doc).map_err(json_err)?;
                f(&mut student).map_err(domain_err)?;
                student.updated_at = Utc::now();

                let doc = serde_json::to_string(&student).map_err(json_err)?;
                tx.execute(schema::UPDATE_STUDENT, rusqlite::params![id_str, doc])
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Student", student_id.to_string()))
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn teaching_row(teaching: &SongTeaching) -> Result<Vec<String>> {
    Ok(vec![
        teaching.id.to_string(),
        teaching.song_id.to_string(),
        teaching.student_id.to_string(),
        format_datetime(&teaching.taught_date),
        serde_json::to_string(teaching)?,
    ])
}

// ============================================================================
// StudentRepository implementation
// ============================================================================

#[async_trait]
impl StudentRepository for SqliteRepository {
    async fn list_students(&self) -> Result<Vec<Student>> {
        self.load_all(schema::SELECT_STUDENTS, "Student").await
    }

    async fn get_student(&self, id: Uuid) -> Result<Option<Student>> {
        self.load_one(schema::SELECT_STUDENT_BY_ID, "Student", id).await
    }

    async fn create_student(&self, student: &Student) -> Result<()> {
        let doc = serde_json::to_string(student)?;
        self.write_doc(schema::INSERT_STUDENT, "Student", student.id, doc)
            .await
    }

    async fn update_student(&self, student: &Student) -> Result<()> {
        let doc = serde_json::to_string(student)?;
        self.write_doc(schema::UPDATE_STUDENT, "Student", student.id, doc)
            .await
    }

    async fn delete_student(&self, id: Uuid) -> Result<()> {
        match self.delete_by(schema::DELETE_STUDENT, "Student", id).await? {
            0 => Err(RepositoryError::student_not_found(id)),
            _ => Ok(()),
        }
    }

    async fn add_note(&self, student_id: Uuid, note: &Note) -> Result<()> {
        let note = note.clone();
        self.modify_student(student_id, move |student| {
            if student.note(note.id).is_some() {
                return Err(RepositoryError::AlreadyExists {
                    entity_type: "Note",
                    id: note.id.to_string(),
                });
            }
            student.notes.push(note);
            Ok(())
        })
        .await
    }

    async fn update_note(&self, student_id: Uuid, note: &Note) -> Result<()> {
        let note = note.clone();
        self.modify_student(student_id, move |student| {
            let existing = student
                .note_mut(note.id)
                .ok_or_else(|| RepositoryError::note_not_found(note.id))?;
            *existing = note;
            Ok(())
        })
        .await
    }

    async fn delete_note(&self, student_id: Uuid, note_id: Uuid) -> Result<()> {
        self.modify_student(student_id, move |student| {
            let before = student.notes.len();
            student.notes.retain(|n| n.id != note_id);
            if student.notes.len() == before {
                return Err(RepositoryError::note_not_found(note_id));
            }
            Ok(())
        })
        .await
    }

    async fn replace_students(&self, students: &[Student]) -> Result<()> {
        let rows = students
            .iter()
            .map(|s| Ok(vec![s.id.to_string(), serde_json::to_string(s)?]))
            .collect::<Result<Vec<_>>>()?;
        self.replace_all(
            schema::DELETE_ALL_STUDENTS,
            schema::INSERT_STUDENT,
            "Student",
            rows,
        )
        .await
    }
}

// ============================================================================
// SongRepository implementation
// ============================================================================

#[async_trait]
impl SongRepository for SqliteRepository {
    async fn list_songs(&self) -> Result<Vec<Song>> {
        self.load_all(schema::SELECT_SONGS, "Song").await
    }

    async fn get_song(&self, id: Uuid) -> Result<Option<Song>> {
        self.load_one(schema::SELECT_SONG_BY_ID, "Song", id).await
    }

    async fn create_song(&self, song: &Song) -> Result<()> {
        let doc = serde_json::to_string(song)?;
        self.write_doc(schema::INSERT_SONG, "Song", song.id, doc).await
    }

    async fn update_song(&self, song: &Song) -> Result<()> {
        let doc = serde_json::to_string(song)?;
        self.write_doc(schema::UPDATE_SONG, "Song", song.id, doc).await
    }

    async fn delete_song(&self, id: Uuid) -> Result<()> {
        match self.delete_by(schema::DELETE_SONG, "Song", id).await? {
            0 => Err(RepositoryError::song_not_found(id)),
            _ => Ok(()),
        }
    }

    async fn record_teaching_on_song(&self, id: Uuid, taught_date: DateTime<Utc>) -> Result<Song> {
        let id_str = id.to_string();
        self.pool
            .get()
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;

                let doc: String = tx
                    .query_row(schema::SELECT_SONG_BY_ID, [&id_str], |row| row.get(0))
                    .map_err(wrap_err)?;
                let mut song: Song = serde_json::from_str(&doc).map_err(json_err)?;
                song.record_teaching(taught_date);

                let doc = serde_json::to_string(&song).map_err(json_err)?;
                tx.execute(schema::UPDATE_SONG, rusqlite::params![id_str, doc])
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(song)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Song", id.to_string()))
    }

    async fn replace_songs(&self, songs: &[Song]) -> Result<()> {
        let rows = songs
            .iter()
            .map(|s| Ok(vec![s.id.to_string(), serde_json::to_string(s)?]))
            .collect::<Result<Vec<_>>>()?;
        self.replace_all(schema::DELETE_ALL_SONGS, schema::INSERT_SONG, "Song", rows)
            .await
    }
}

// ============================================================================
// TeachingRepository implementation
// ============================================================================

#[async_trait]
impl TeachingRepository for SqliteRepository {
    async fn list_teachings(&self) -> Result<Vec<SongTeaching>> {
        self.load_all(schema::SELECT_TEACHINGS, "SongTeaching").await
    }

    async fn create_teaching(&self, teaching: &SongTeaching) -> Result<()> {
        let row = teaching_row(teaching)?;
        let teaching_id = teaching.id.to_string();

        self.pool
            .get()
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_TEACHING,
                    rusqlite::params_from_iter(row.iter()),
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "SongTeaching", teaching_id))
    }

    async fn delete_teachings_for_student(&self, student_id: Uuid) -> Result<usize> {
        self.delete_by(schema::DELETE_TEACHINGS_BY_STUDENT, "SongTeaching", student_id)
            .await
    }

    async fn delete_teachings_for_song(&self, song_id: Uuid) -> Result<usize> {
        self.delete_by(schema::DELETE_TEACHINGS_BY_SONG, "SongTeaching", song_id)
            .await
    }

    async fn replace_teachings(&self, teachings: &[SongTeaching]) -> Result<()> {
        let rows = teachings
            .iter()
            .map(teaching_row)
            .collect::<Result<Vec<_>>>()?;
        self.replace_all(
            schema::DELETE_ALL_TEACHINGS,
            schema::INSERT_TEACHING,
            "SongTeaching",
            rows,
        )
        .await
    }
}

// ============================================================================
// SettingsRepository implementation
// ============================================================================

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Settings> {
        let doc = self
            .pool
            .get()
            .call(|conn| {
                conn.query_row(schema::SELECT_SETTINGS, [], |row| row.get::<_, String>(0))
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Settings", "settings"))?;

        match doc {
            Some(doc) => Ok(serde_json::from_str(&doc)?),
            None => Ok(Settings::default()),
        }
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let doc = serde_json::to_string(settings)?;
        self.pool
            .get()
            .call(move |conn| {
                conn.execute(schema::UPSERT_SETTINGS, [&doc]).map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Settings", "settings"))
    }
}
