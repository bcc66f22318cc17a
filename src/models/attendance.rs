use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Excused,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttendanceRecord {
    pub attendance_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub student_name: String,
    pub student_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAttendance {
    pub section_id: i64,
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAttendance {
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRatio {
    pub total_classes: i64,
    pub present: i64,
    pub excused: i64,
    pub absent: i64,
    pub participation_rate: String,
}
