//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use lessonbook_core::lesson::{Note, Settings, Song, SongTeaching, Student};
use lessonbook_core::storage::{
    RepositoryError, Result, SettingsRepository, SongRepository, StudentRepository,
    TeachingRepository,
};

/// In-memory storage backend.
///
/// Clones share the same underlying maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    students: Arc<RwLock<HashMap<Uuid, Student>>>,
    songs: Arc<RwLock<HashMap<Uuid, Song>>>,
    teachings: Arc<RwLock<HashMap<Uuid, SongTeaching>>>,
    settings: Arc<RwLock<Option<Settings>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentRepository for InMemoryRepository {
    async fn list_students(&self) -> Result<Vec<Student>> {
        let students = self.students.read().await;
        Ok(students.values().cloned().collect())
    }

    async fn get_student(&self, id: Uuid) -> Result<Option<Student>> {
        let students = self.students.read().await;
        Ok(students.get(&id).cloned())
    }

    async fn create_student(&self, student: &Student) -> Result<()> {
        let mut students = self.students.write().await;
        if students.contains_key(&student.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Student",
                id: student.id.to_string(),
            });
        }
        students.insert(student.id, student.clone());
        Ok(())
    }

    async fn update_student(&self, student: &Student) -> Result<()> {
        let mut students = self.students.write().await;
        match students.get_mut(&student.id) {
            Some(existing) => {
                *existing = student.clone();
                Ok(())
            }
            None => Err(RepositoryError::student_not_found(student.id)),
        }
    }

    async fn delete_student(&self, id: Uuid) -> Result<()> {
        let mut students = self.students.write().await;
        if students.remove(&id).is_none() {
            return Err(RepositoryError::student_not_found(id));
        }
        Ok(())
    }

    async fn add_note(&self, student_id: Uuid, note: &Note) -> Result<()> {
        let mut students = self.students.write().await;
        let student = students
            .get_mut(&student_id)
            .ok_or_else(|| RepositoryError::student_not_found(student_id))?;

        if student.note(note.id).is_some() {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Note",
                id: note.id.to_string(),
            });
        }
        student.notes.push(note.clone());
        student.updated_at = Utc::now();
        Ok(())
    }

    async fn update_note(&self, student_id: Uuid, note: &Note) -> Result<()> {
        let mut students = self.students.write().await;
        let student = students
            .get_mut(&student_id)
            .ok_or_else(|| RepositoryError::student_not_found(student_id))?;

        let existing = student
            .note_mut(note.id)
            .ok_or_else(|| RepositoryError::note_not_found(note.id))?;
        *existing = note.clone();
        student.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_note(&self, student_id: Uuid, note_id: Uuid) -> Result<()> {
        let mut students = self.students.write().await;
        let student = students
            .get_mut(&student_id)
            .ok_or_else(|| RepositoryError::student_not_found(student_id))?;

        let before = student.notes.len();
        student.notes.retain(|n| n.id != note_id);
        if student.notes.len() == before {
            return Err(RepositoryError::note_not_found(note_id));
        }
        student.updated_at = Utc::now();
        Ok(())
    }

    async fn replace_students(&self, students: &[Student]) -> Result<()> {
        let replacement = students.iter().map(|s| (s.id, s.clone())).collect();
        *self.students.write().await = replacement;
        Ok(())
    }
}

#[async_trait]
impl SongRepository for InMemoryRepository {
    async fn list_songs(&self) -> Result<Vec<Song>> {
        let songs = self.songs.read().await;
        Ok(songs.values().cloned().collect())
    }

    async fn get_song(&self, id: Uuid) -> Result<Option<Song>> {
        let songs = self.songs.read().await;
        Ok(songs.get(&id).cloned())
    }

    async fn create_song(&self, song: &Song) -> Result<()> {
        let mut songs = self.songs.write().await;
        if songs.contains_key(&song.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Song",
                id: song.id.to_string(),
            });
        }
        songs.insert(song.id, song.clone());
        Ok(())
    }

    async fn update_song(&self, song: &Song) -> Result<()> {
        let mut songs = self.songs.write().await;
        match songs.get_mut(&song.id) {
            Some(existing) => {
                *existing = song.clone();
                Ok(())
            }
            None => Err(RepositoryError::song_not_found(song.id)),
        }
    }

    async fn delete_song(&self, id: Uuid) -> Result<()> {
        let mut songs = self.songs.write().await;
        if songs.remove(&id).is_none() {
            return Err(RepositoryError::song_not_found(id));
        }
        Ok(())
    }

    async fn record_teaching_on_song(&self, id: Uuid, taught_date: DateTime<Utc>) -> Result<Song> {
        // Held across read and write so concurrent teachings never lose an increment
        let mut songs = self.songs.write().await;
        let song = songs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::song_not_found(id))?;
        song.record_teaching(taught_date);
        Ok(song.clone())
    }

    async fn replace_songs(&self, songs: &[Song]) -> Result<()> {
        let replacement = songs.iter().map(|s| (s.id, s.clone())).collect();
        *self.songs.write().await = replacement;
        Ok(())
    }
}

#[async_trait]
impl TeachingRepository for InMemoryRepository {
    async fn list_teachings(&self) -> Result<Vec<SongTeaching>> {
        let teachings = self.teachings.read().await;
        let mut all: Vec<SongTeaching> = teachings.values().cloned().collect();
        all.sort_by(|a, b| b.taught_date.cmp(&a.taught_date));
        Ok(all)
    }

    async fn create_teaching(&self, teaching: &SongTeaching) -> Result<()> {
        let mut teachings = self.teachings.write().await;
        if teachings.contains_key(&teaching.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "SongTeaching",
                id: teaching.id.to_string(),
            });
        }
        teachings.insert(teaching.id, teaching.clone());
        Ok(())
    }

    async fn delete_teachings_for_student(&self, student_id: Uuid) -> Result<usize> {
        let mut teachings = self.teachings.write().await;
        let before = teachings.len();
        teachings.retain(|_, t| t.student_id != student_id);
        Ok(before - teachings.len())
    }

    async fn delete_teachings_for_song(&self, song_id: Uuid) -> Result<usize> {
        let mut teachings = self.teachings.write().await;
        let before = teachings.len();
        teachings.retain(|_, t| t.song_id != song_id);
        Ok(before - teachings.len())
    }

    async fn replace_teachings(&self, teachings: &[SongTeaching]) -> Result<()> {
        let replacement = teachings.iter().map(|t| (t.id, t.clone())).collect();
        *self.teachings.write().await = replacement;
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Settings> {
        Ok(self.settings.read().await.clone().unwrap_or_default())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<()> {
        *self.settings.write().await = Some(settings.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_student() -> Student {
        Student::new("Ana", "Guitar", "1", "Monday", "10:00")
    }

    #[tokio::test]
    async fn test_student_crud() {
        let repo = InMemoryRepository::new();
        let mut student = sample_student();

        repo.create_student(&student).await.unwrap();
        assert_eq!(repo.list_students().await.unwrap().len(), 1);

        student.name = "Bea".to_string();
        repo.update_student(&student).await.unwrap();
        assert_eq!(
            repo.get_student(student.id).await.unwrap().unwrap().name,
            "Bea"
        );

        repo.delete_student(student.id).await.unwrap();
        assert!(repo.get_student(student.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_student() {
        let repo = InMemoryRepository::new();
        let student = sample_student();

        repo.create_student(&student).await.unwrap();
        let result = repo.create_student(&student).await;

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_missing_student() {
        let repo = InMemoryRepository::new();
        let result = repo.update_student(&sample_student()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_note_lifecycle_bumps_updated_at() {
        let repo = InMemoryRepository::new();
        let mut student = sample_student();
        student.updated_at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        repo.create_student(&student).await.unwrap();

        let mut note = Note::new("Scales");
        repo.add_note(student.id, &note).await.unwrap();

        let stored = repo.get_student(student.id).await.unwrap().unwrap();
        assert_eq!(stored.notes.len(), 1);
        assert!(stored.updated_at > student.updated_at);

        note.content = "Arpeggios".to_string();
        repo.update_note(student.id, &note).await.unwrap();
        let stored = repo.get_student(student.id).await.unwrap().unwrap();
        assert_eq!(stored.notes[0].content, "Arpeggios");

        repo.delete_note(student.id, note.id).await.unwrap();
        let result = repo.delete_note(student.id, note.id).await;
        assert!(matches!(
            result,
            Err(RepositoryError::NotFound {
                entity_type: "Note",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_add_note_duplicate_id() {
        let repo = InMemoryRepository::new();
        let student = sample_student();
        repo.create_student(&student).await.unwrap();

        let note = Note::new("Scales");
        repo.add_note(student.id, &note).await.unwrap();

        assert!(repo.add_note(student.id, &note).await.is_err());
    }

    #[tokio::test]
    async fn test_record_teaching_increments_once_per_call() {
        let repo = InMemoryRepository::new();
        let song = Song::new("Tune", "Trad");
        repo.create_song(&song).await.unwrap();

        let date = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        repo.record_teaching_on_song(song.id, date).await.unwrap();
        let updated = repo.record_teaching_on_song(song.id, date).await.unwrap();

        assert_eq!(updated.frequency, 2);
        assert_eq!(updated.last_taught, Some(date));
    }

    #[tokio::test]
    async fn test_concurrent_teachings_do_not_lose_increments() {
        let repo = InMemoryRepository::new();
        let song = Song::new("Tune", "Trad");
        repo.create_song(&song).await.unwrap();
        let song_id = song.id;

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.record_teaching_on_song(song_id, Utc::now()).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.get_song(song_id).await.unwrap().unwrap().frequency, 20);
    }

    #[tokio::test]
    async fn test_delete_teachings_for_student() {
        let repo = InMemoryRepository::new();
        let student_a = Uuid::new_v4();
        let student_b = Uuid::new_v4();
        let song = Uuid::new_v4();

        for student in [student_a, student_a, student_b] {
            repo.create_teaching(&SongTeaching::new(song, student, Utc::now()))
                .await
                .unwrap();
        }

        assert_eq!(repo.delete_teachings_for_student(student_a).await.unwrap(), 2);
        assert_eq!(repo.list_teachings().await.unwrap().len(), 1);
        assert_eq!(repo.delete_teachings_for_song(song).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_settings_default_then_saved() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_settings().await.unwrap(), Settings::default());

        let settings = Settings::with_instruments(["Piano"]);
        repo.save_settings(&settings).await.unwrap();

        assert_eq!(repo.get_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_replace_students() {
        let repo = InMemoryRepository::new();
        repo.create_student(&sample_student()).await.unwrap();

        let replacement = vec![sample_student(), sample_student()];
        repo.replace_students(&replacement).await.unwrap();

        let listed = repo.list_students().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|s| replacement.iter().any(|r| r.id == s.id)));
    }
}
