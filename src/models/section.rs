use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Listing row with the live enrolled count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SectionOverview {
    pub section_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub semester: String,
    pub year: i64,
    pub schedule_day: String,
    pub schedule_time: String,
    pub classroom: String,
    pub capacity: i64,
    pub instructor_name: Option<String>,
    pub current_enrolled: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSection {
    pub course_code: String,
    pub instructor_id: i64,
    pub semester: String,
    pub year: i64,
    pub schedule_day: String,
    pub schedule_time: String,
    pub classroom: String,
    pub capacity: i64,
}

/// Sparse update; unset fields keep their current values, including for
/// the schedule-conflict comparison.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSection {
    pub classroom: Option<String>,
    pub capacity: Option<i64>,
    pub instructor_id: Option<i64>,
}
