use sqlx::{FromRow, SqlitePool};

use crate::error::AppError;
use crate::models::{CompletionStatus, EnrollmentDetail, UpdateEnrollment};

pub async fn list(
    db: &SqlitePool,
    section_id: Option<i64>,
    student_id: Option<i64>,
) -> Result<Vec<EnrollmentDetail>, AppError> {
    let mut sql = String::from(
        "SELECT e.enrollment_id, e.student_id, u.full_name AS student_name, e.section_id,
                c.course_code, c.title AS course_name, e.grade, e.completion_status
         FROM enrollments e
         JOIN users u ON e.student_id = u.user_id
         JOIN course_sections s ON e.section_id = s.section_id
         JOIN courses c ON s.course_id = c.course_id
         WHERE 1=1",
    );
    if section_id.is_some() {
        sql.push_str(" AND e.section_id = ?");
    }
    if student_id.is_some() {
        sql.push_str(" AND e.student_id = ?");
    }

    let mut query = sqlx::query_as::<_, EnrollmentDetail>(&sql);
    if let Some(id) = section_id {
        query = query.bind(id);
    }
    if let Some(id) = student_id {
        query = query.bind(id);
    }

    Ok(query.fetch_all(db).await?)
}

#[derive(Debug, FromRow)]
struct GradeRow {
    grade: Option<f64>,
    completion_status: CompletionStatus,
}

/// Sparse grade/status update by the teaching staff.
pub async fn update(
    db: &SqlitePool,
    enrollment_id: i64,
    req: &UpdateEnrollment,
) -> Result<(), AppError> {
    if req.grade.is_none() && req.completion_status.is_none() {
        return Err(AppError::Validation("No fields provided".to_string()));
    }

    let mut current = sqlx::query_as::<_, GradeRow>(
        "SELECT grade, completion_status FROM enrollments WHERE enrollment_id = ?",
    )
    .bind(enrollment_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

    if let Some(grade) = req.grade {
        current.grade = Some(grade);
    }
    if let Some(status) = req.completion_status {
        current.completion_status = status;
    }

    sqlx::query("UPDATE enrollments SET grade = ?, completion_status = ? WHERE enrollment_id = ?")
        .bind(current.grade)
        .bind(current.completion_status)
        .bind(enrollment_id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn owner_of(db: &SqlitePool, enrollment_id: i64) -> Result<Option<i64>, AppError> {
    let owner = sqlx::query_scalar("SELECT student_id FROM enrollments WHERE enrollment_id = ?")
        .bind(enrollment_id)
        .fetch_optional(db)
        .await?;
    Ok(owner)
}

pub async fn delete(db: &SqlitePool, enrollment_id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM enrollments WHERE enrollment_id = ?")
        .bind(enrollment_id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn is_enrolled(
    db: &SqlitePool,
    student_id: i64,
    section_id: i64,
) -> Result<bool, AppError> {
    let found: i64 = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM enrollments WHERE student_id = ? AND section_id = ?)",
    )
    .bind(student_id)
    .bind(section_id)
    .fetch_one(db)
    .await?;
    Ok(found == 1)
}
