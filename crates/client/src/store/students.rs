//! Student roster and lesson notes.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use lessonbook_core::lesson::{
    sort_students_by_name, CreateNoteRequest, CreateStudentRequest, Note, Student,
    UpdateNoteRequest, UpdateStudentRequest,
};

use super::{load, optimistic, LessonApi, StoreState};
use crate::error::Result;

/// Local mirror of `/api/students`.
pub struct StudentStore<A: LessonApi> {
    api: Arc<A>,
    state: RwLock<StoreState<Vec<Student>>>,
}

impl<A: LessonApi> StudentStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> StoreState<Vec<Student>> {
        self.state.read().await.clone()
    }

    pub async fn student(&self, id: Uuid) -> Option<Student> {
        self.state
            .read()
            .await
            .data
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Replaces the roster with the server's.
    pub async fn fetch(&self) -> Result<()> {
        load(&self.state, self.api.list_students()).await
    }

    /// Adds a placeholder student, then swaps it for the stored one.
    pub async fn create(&self, request: CreateStudentRequest) -> Result<Student> {
        let placeholder = request.clone().into_student();
        let temp_id = placeholder.id;

        optimistic(
            &self.state,
            |students| {
                students.push(placeholder);
                sort_students_by_name(students);
            },
            self.api.create_student(&request),
            |students, created| replace_student(students, temp_id, created),
        )
        .await
    }

    pub async fn update(&self, id: Uuid, request: UpdateStudentRequest) -> Result<Student> {
        let local = request.clone();
        optimistic(
            &self.state,
            |students| {
                if let Some(student) = students.iter_mut().find(|s| s.id == id) {
                    local.apply_to(student);
                }
            },
            self.api.update_student(id, &request),
            |students, updated| replace_student(students, id, updated),
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        optimistic(
            &self.state,
            |students| students.retain(|s| s.id != id),
            self.api.delete_student(id),
            |_, _| {},
        )
        .await
    }

    pub async fn add_note(&self, student_id: Uuid, request: CreateNoteRequest) -> Result<Note> {
        let placeholder = request.clone().into_note();
        let temp_id = placeholder.id;

        optimistic(
            &self.state,
            |students| {
                if let Some(student) = students.iter_mut().find(|s| s.id == student_id) {
                    student.notes.push(placeholder);
                }
            },
            self.api.create_note(student_id, &request),
            |students, created| replace_note(students, student_id, temp_id, created),
        )
        .await
    }

    pub async fn update_note(
        &self,
        student_id: Uuid,
        note_id: Uuid,
        request: UpdateNoteRequest,
    ) -> Result<Note> {
        let local = request.clone();
        optimistic(
            &self.state,
            |students| {
                if let Some(note) = students
                    .iter_mut()
                    .find(|s| s.id == student_id)
                    .and_then(|s| s.note_mut(note_id))
                {
                    local.apply_to(note);
                }
            },
            self.api.update_note(student_id, note_id, &request),
            |students, updated| replace_note(students, student_id, note_id, updated),
        )
        .await
    }

    pub async fn delete_note(&self, student_id: Uuid, note_id: Uuid) -> Result<()> {
        optimistic(
            &self.state,
            |students| {
                if let Some(student) = students.iter_mut().find(|s| s.id == student_id) {
                    student.notes.retain(|n| n.id != note_id);
                }
            },
            self.api.delete_note(student_id, note_id),
            |_, _| {},
        )
        .await
    }
}

fn replace_student(students: &mut Vec<Student>, id: Uuid, stored: &Student) {
    match students.iter_mut().find(|s| s.id == id) {
        Some(slot) => *slot = stored.clone(),
        None => students.push(stored.clone()),
    }
    sort_students_by_name(students);
}

fn replace_note(students: &mut [Student], student_id: Uuid, note_id: Uuid, stored: &Note) {
    let Some(student) = students.iter_mut().find(|s| s.id == student_id) else {
        return;
    };
    match student.note_mut(note_id) {
        Some(slot) => *slot = stored.clone(),
        None => student.notes.push(stored.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mock::MockApi;

    fn request(name: &str) -> CreateStudentRequest {
        CreateStudentRequest::new(name, "Guitar", "1", "Monday", "10:00")
    }

    async fn seeded() -> (Arc<MockApi>, StudentStore<MockApi>, Student) {
        let api = Arc::new(MockApi::default());
        let student = Student::new("Ana", "Guitar", "1", "Monday", "10:00")
            .with_note(Note::new("Scales"));
        api.students.lock().unwrap().push(student.clone());

        let store = StudentStore::new(api.clone());
        store.fetch().await.unwrap();
        (api, store, student)
    }

    #[tokio::test]
    async fn test_fetch_loads_roster() {
        let (_api, store, student) = seeded().await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.data, vec![student]);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.error, None);
    }

    #[tokio::test]
    async fn test_create_replaces_placeholder() {
        let (api, store, _) = seeded().await;

        let created = store.create(request("Bea")).await.unwrap();

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.data.len(), 2);
        assert_eq!(snapshot.data[1], created);
        assert_eq!(api.students.lock().unwrap()[1].id, created.id);
    }

    #[tokio::test]
    async fn test_failed_create_rolls_back() {
        let (api, store, student) = seeded().await;
        api.fail();

        let err = store.create(request("Bea")).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.data, vec![student]);
        assert_eq!(snapshot.error.as_deref(), Some("Server exploded"));
    }

    #[tokio::test]
    async fn test_update_keeps_other_fields() {
        let (_api, store, student) = seeded().await;

        store
            .update(student.id, UpdateStudentRequest::default().with_name("B"))
            .await
            .unwrap();

        let stored = store.student(student.id).await.unwrap();
        assert_eq!(stored.name, "B");
        assert_eq!(stored.instrument, "Guitar");
    }

    #[tokio::test]
    async fn test_failed_delete_restores_student() {
        let (api, store, student) = seeded().await;
        api.fail();

        assert!(store.delete(student.id).await.is_err());

        assert_eq!(store.student(student.id).await, Some(student));
    }

    #[tokio::test]
    async fn test_note_lifecycle() {
        let (_api, store, student) = seeded().await;

        let note = store
            .add_note(student.id, CreateNoteRequest::new("Arpeggios"))
            .await
            .unwrap();
        let notes = store.student(student.id).await.unwrap().notes;
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1], note);

        store.delete_note(student.id, note.id).await.unwrap();
        let notes = store.student(student.id).await.unwrap().notes;
        assert_eq!(notes, student.notes);
    }

    #[tokio::test]
    async fn test_failed_note_update_rolls_back() {
        let (api, store, student) = seeded().await;
        api.fail();
        let note_id = student.notes[0].id;
        let request = UpdateNoteRequest {
            content: Some("Changed".to_string()),
            ..Default::default()
        };

        assert!(store.update_note(student.id, note_id, request).await.is_err());

        let stored = store.student(student.id).await.unwrap();
        assert_eq!(stored.notes[0].content, "Scales");
    }
}
