use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::CompletionStatus;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentProfileView {
    pub full_name: String,
    pub email: String,
    pub student_id: i64,
    pub admission_year: Option<i64>,
    pub current_gpa: Option<f64>,
    pub credits_earned: f64,
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStudentProfile {
    pub department_id: Option<i64>,
    pub admission_year: Option<i64>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InstructorProfileView {
    pub full_name: String,
    pub email: String,
    pub instructor_id: i64,
    pub title: Option<String>,
    pub office_location: Option<String>,
    pub research_interests: Option<String>,
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInstructorProfile {
    pub title: Option<String>,
    pub office_location: Option<String>,
    pub research_interests: Option<String>,
}

/// One graded enrollment on a transcript.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TranscriptEntry {
    pub course_code: String,
    pub course_name: String,
    pub credits: f64,
    pub grade: Option<f64>,
    pub completion_status: CompletionStatus,
    pub semester: String,
}

/// Result of a GPA recomputation, also persisted onto the profile.
#[derive(Debug, Clone, Serialize)]
pub struct GpaSummary {
    pub student_id: i64,
    pub gpa: f64,
    pub credits_earned: f64,
}
