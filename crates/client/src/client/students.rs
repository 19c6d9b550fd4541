//! Student API operations.

use uuid::Uuid;

use lessonbook_core::lesson::{CreateStudentRequest, Student, UpdateStudentRequest};

use super::LessonbookClient;
use crate::error::Result;

impl LessonbookClient {
    /// List all students, ordered by name.
    pub async fn list_students(&self) -> Result<Vec<Student>> {
        self.get("/api/students").await
    }

    /// Get student by ID.
    pub async fn get_student(&self, id: Uuid) -> Result<Student> {
        self.get(&format!("/api/students/{id}")).await
    }

    /// Create a new student.
    pub async fn create_student(&self, request: &CreateStudentRequest) -> Result<Student> {
        self.post("/api/students", request).await
    }

    /// Update a student. Absent fields are left unchanged.
    pub async fn update_student(&self, id: Uuid, request: &UpdateStudentRequest) -> Result<Student> {
        self.put(&format!("/api/students/{id}"), request).await
    }

    /// Delete a student and their teaching records.
    pub async fn delete_student(&self, id: Uuid) -> Result<()> {
        self.delete(&format!("/api/students/{id}")).await
    }
}
