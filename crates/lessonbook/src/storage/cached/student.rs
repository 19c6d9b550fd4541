//! Cached student repository decorator.
//!
//! Notes live inside their student, so every note mutation invalidates the
//! owning student's keys.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use lessonbook_core::cache::{student_key, student_pattern, students_key, Cache};
use lessonbook_core::lesson::{Note, Student};
use lessonbook_core::storage::{Result, StudentRepository};

use super::{cached, invalidate, invalidate_pattern, Generation};

/// Cached student repository decorator.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedStudentRepository<R, C>
where
    R: StudentRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache: Arc<C>,
    generation: Generation,
}

impl<R, C> CachedStudentRepository<R, C>
where
    R: StudentRepository,
    C: Cache,
{
    /// Creates a new cached student repository.
    pub fn new(repository: Arc<R>, cache: Arc<C>) -> Self {
        Self {
            repository,
            cache,
            generation: Generation::default(),
        }
    }

    async fn invalidate_student(&self, id: Uuid) {
        let _write = self.generation.advance().await;
        invalidate(self.cache.as_ref(), &[students_key(), student_key(id)]).await;
    }
}

#[async_trait]
impl<R, C> StudentRepository for CachedStudentRepository<R, C>
where
    R: StudentRepository + 'static,
    C: Cache + 'static,
{
    async fn list_students(&self) -> Result<Vec<Student>> {
        let key = students_key();
        if let Some(students) = cached(self.cache.as_ref(), &key).await {
            return Ok(students);
        }

        let seen = self.generation.current().await;
        let students = self.repository.list_students().await?;
        self.generation
            .populate(seen, self.cache.as_ref(), &key, &students)
            .await;
        Ok(students)
    }

    async fn get_student(&self, id: Uuid) -> Result<Option<Student>> {
        let key = student_key(id);
        if let Some(student) = cached(self.cache.as_ref(), &key).await {
            return Ok(Some(student));
        }

        let seen = self.generation.current().await;
        let student = self.repository.get_student(id).await?;
        if let Some(ref s) = student {
            self.generation.populate(seen, self.cache.as_ref(), &key, s).await;
        }
        Ok(student)
    }

    async fn create_student(&self, student: &Student) -> Result<()> {
        self.repository.create_student(student).await?;
        self.invalidate_student(student.id).await;

        tracing::debug!(student_id = %student.id, name = %student.name, "Student created");
        Ok(())
    }

    async fn update_student(&self, student: &Student) -> Result<()> {
        self.repository.update_student(student).await?;
        self.invalidate_student(student.id).await;

        tracing::debug!(student_id = %student.id, "Student updated");
        Ok(())
    }

    async fn delete_student(&self, id: Uuid) -> Result<()> {
        self.repository.delete_student(id).await?;
        self.invalidate_student(id).await;

        tracing::debug!(student_id = %id, "Student deleted");
        Ok(())
    }

    async fn add_note(&self, student_id: Uuid, note: &Note) -> Result<()> {
        self.repository.add_note(student_id, note).await?;
        self.invalidate_student(student_id).await;

        tracing::debug!(%student_id, note_id = %note.id, "Note added");
        Ok(())
    }

    async fn update_note(&self, student_id: Uuid, note: &Note) -> Result<()> {
        self.repository.update_note(student_id, note).await?;
        self.invalidate_student(student_id).await;

        tracing::debug!(%student_id, note_id = %note.id, "Note updated");
        Ok(())
    }

    async fn delete_note(&self, student_id: Uuid, note_id: Uuid) -> Result<()> {
        self.repository.delete_note(student_id, note_id).await?;
        self.invalidate_student(student_id).await;

        tracing::debug!(%student_id, %note_id, "Note deleted");
        Ok(())
    }

    async fn replace_students(&self, students: &[Student]) -> Result<()> {
        self.repository.replace_students(students).await?;
        let _write = self.generation.advance().await;
        invalidate(self.cache.as_ref(), &[students_key()]).await;
        invalidate_pattern(self.cache.as_ref(), &student_pattern()).await;

        tracing::debug!(count = students.len(), "Students replaced");
        Ok(())
    }
}
