use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Course {
    pub course_id: i64,
    pub course_code: String,
    pub title: String,
    pub department_id: i64,
    pub credits: f64,
    pub description: Option<String>,
}

/// Catalog listing row, joined to the owning department.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CourseSummary {
    pub course_code: String,
    pub title: String,
    pub credits: f64,
    pub description: Option<String>,
    pub department_name: Option<String>,
}

/// A course an instructor has taught at least one section of.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TaughtCourse {
    pub course_code: String,
    pub title: String,
    pub credits: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Prerequisite {
    pub course_code: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub course_code: String,
    pub title: String,
    pub department_id: i64,
    pub credits: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub credits: Option<f64>,
    pub description: Option<String>,
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPrerequisite {
    pub course_code: String,
    pub prerequisite_code: String,
}
