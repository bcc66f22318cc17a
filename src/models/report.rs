use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InstructorWorkloadRow {
    pub instructor_id: i64,
    pub full_name: String,
    pub sections_taught: i64,
    pub total_students: i64,
    pub success_percentage: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CourseDifficultyRow {
    pub course_code: String,
    pub title: String,
    pub total_students: i64,
    pub failures: i64,
    pub failure_rate: f64,
}

/// Per-student aggregates for one semester, before scoring.
#[derive(Debug, Clone, FromRow)]
pub struct RiskAggregateRow {
    pub student_id: i64,
    pub full_name: String,
    pub current_gpa: Option<f64>,
    pub avg_grade: Option<f64>,
    pub total_classes: i64,
    pub absences: i64,
    pub total_assignments: i64,
    pub submitted: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AtRiskStudent {
    pub student_id: i64,
    pub full_name: String,
    pub current_gpa: Option<f64>,
    pub avg_grade: Option<f64>,
    pub risk_score: f64,
}
