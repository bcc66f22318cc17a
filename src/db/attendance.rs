use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::{AppError, conflict_on_unique};
use crate::models::{AttendanceRatio, AttendanceRecord, AttendanceStatus, NewAttendance};

pub async fn list(
    db: &SqlitePool,
    section_id: i64,
    student_id: Option<i64>,
    date_filter: Option<NaiveDate>,
) -> Result<Vec<AttendanceRecord>, AppError> {
    let mut sql = String::from(
        "SELECT a.attendance_id, a.date, a.status, u.full_name AS student_name, u.user_id AS student_id
         FROM attendance a
         JOIN users u ON a.student_id = u.user_id
         WHERE a.section_id = ?",
    );
    if student_id.is_some() {
        sql.push_str(" AND a.student_id = ?");
    }
    if date_filter.is_some() {
        sql.push_str(" AND a.date = ?");
    }
    sql.push_str(" ORDER BY a.date DESC");

    let mut query = sqlx::query_as::<_, AttendanceRecord>(&sql).bind(section_id);
    if let Some(id) = student_id {
        query = query.bind(id);
    }
    if let Some(date) = date_filter {
        query = query.bind(date);
    }

    Ok(query.fetch_all(db).await?)
}

/// Participation rollup for one (section, student); `None` when the pair
/// has no records at all.
pub async fn ratio(
    db: &SqlitePool,
    section_id: i64,
    student_id: i64,
) -> Result<Option<AttendanceRatio>, AppError> {
    let (total, present, excused, absent): (i64, i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*),
                COALESCE(SUM(CASE WHEN status = 'Present' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'Excused' THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = 'Absent' THEN 1 ELSE 0 END), 0)
         FROM attendance
         WHERE section_id = ? AND student_id = ?",
    )
    .bind(section_id)
    .bind(student_id)
    .fetch_one(db)
    .await?;

    if total == 0 {
        return Ok(None);
    }

    let participation = (present + excused) as f64 / total as f64 * 100.0;
    Ok(Some(AttendanceRatio {
        total_classes: total,
        present,
        excused,
        absent,
        participation_rate: format!("{participation:.2}%"),
    }))
}

/// One record per (section, student, day). The pre-check yields the
/// friendly error; the unique index settles a concurrent duplicate.
pub async fn record(db: &SqlitePool, rec: &NewAttendance) -> Result<(), AppError> {
    let exists: i64 = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM attendance WHERE section_id = ? AND student_id = ? AND date = ?)",
    )
    .bind(rec.section_id)
    .bind(rec.student_id)
    .bind(rec.date)
    .fetch_one(db)
    .await?;
    if exists == 1 {
        return Err(AppError::Conflict("Attendance already recorded".to_string()));
    }

    sqlx::query("INSERT INTO attendance (section_id, student_id, date, status) VALUES (?, ?, ?, ?)")
        .bind(rec.section_id)
        .bind(rec.student_id)
        .bind(rec.date)
        .bind(rec.status)
        .execute(db)
        .await
        .map_err(|e| conflict_on_unique(e, "Attendance already recorded"))?;

    Ok(())
}

pub async fn section_of(db: &SqlitePool, attendance_id: i64) -> Result<Option<i64>, AppError> {
    let section = sqlx::query_scalar("SELECT section_id FROM attendance WHERE attendance_id = ?")
        .bind(attendance_id)
        .fetch_optional(db)
        .await?;
    Ok(section)
}

pub async fn update_status(
    db: &SqlitePool,
    attendance_id: i64,
    status: AttendanceStatus,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE attendance SET status = ? WHERE attendance_id = ?")
        .bind(status)
        .bind(attendance_id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Attendance record not found".to_string()));
    }
    Ok(())
}

/// Clears a whole section/day; returns how many records went away.
pub async fn bulk_clear(
    db: &SqlitePool,
    section_id: i64,
    date: NaiveDate,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM attendance WHERE section_id = ? AND date = ?")
        .bind(section_id)
        .bind(date)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
