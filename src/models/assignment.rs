use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Assignment {
    pub assignment_id: i64,
    pub section_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub max_score: i64,
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAssignment {
    pub section_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub max_score: i64,
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAssignment {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_score: Option<i64>,
    pub weight: Option<f64>,
}
