use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-assignment listing row, joined to the submitting student.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AssignmentSubmission {
    pub submission_id: i64,
    pub student_id: i64,
    pub full_name: String,
    pub submission_text: Option<String>,
    pub file_path: Option<String>,
    pub submission_date: DateTime<Utc>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
}

/// Per-student listing row, joined to the assignment title.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentSubmission {
    pub submission_id: i64,
    pub title: String,
    pub submission_text: Option<String>,
    pub file_path: Option<String>,
    pub submission_date: DateTime<Utc>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub submission_text: Option<String>,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradeRequest {
    pub grade: f64,
    pub feedback: Option<String>,
}
