use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle tag of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum CompletionStatus {
    Enrolled,
    Completed,
    Dropped,
    Failed,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnrollmentDetail {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub section_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub grade: Option<f64>,
    pub completion_status: CompletionStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrollRequest {
    pub section_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEnrollment {
    pub grade: Option<f64>,
    pub completion_status: Option<CompletionStatus>,
}
