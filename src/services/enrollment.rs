//! Enrollment admission: capacity, prerequisite chain and duplicate
//! prevention, decided inside a single transaction.

use sqlx::{FromRow, SqlitePool};
use tracing::info;

use crate::error::{AppError, conflict_on_unique};

#[derive(Debug, FromRow)]
struct SectionOccupancy {
    course_id: i64,
    capacity: i64,
    current_count: i64,
}

/// Admits `student_id` into `section_id` or fails with the specific
/// reason. All checks and the insert share one transaction; an early
/// failure rolls everything back, so no partial enrollment can persist.
/// The (student, section) unique index is the final arbiter of
/// duplication; the insert is optimistic, not pre-checked.
pub async fn enroll(db: &SqlitePool, student_id: i64, section_id: i64) -> Result<(), AppError> {
    let mut tx = db.begin().await?;

    let section = sqlx::query_as::<_, SectionOccupancy>(
        "SELECT s.course_id, s.capacity,
                (SELECT COUNT(*) FROM enrollments WHERE section_id = s.section_id) AS current_count
         FROM course_sections s
         WHERE s.section_id = ?",
    )
    .bind(section_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;

    if section.current_count >= section.capacity {
        return Err(AppError::Conflict("Section is full".to_string()));
    }

    let prerequisites: Vec<i64> =
        sqlx::query_scalar("SELECT prerequisite_id FROM course_prerequisites WHERE course_id = ?")
            .bind(section.course_id)
            .fetch_all(&mut *tx)
            .await?;

    for prerequisite_id in prerequisites {
        let completed: i64 = sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM enrollments e
                 JOIN course_sections s ON e.section_id = s.section_id
                 WHERE e.student_id = ? AND s.course_id = ? AND e.completion_status = 'Completed')",
        )
        .bind(student_id)
        .bind(prerequisite_id)
        .fetch_one(&mut *tx)
        .await?;

        if completed == 0 {
            return Err(AppError::Conflict(format!(
                "Prerequisite course ID {prerequisite_id} not completed"
            )));
        }
    }

    sqlx::query(
        "INSERT INTO enrollments (student_id, section_id, completion_status) VALUES (?, ?, 'Enrolled')",
    )
    .bind(student_id)
    .bind(section_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, "Already enrolled in this section"))?;

    tx.commit().await?;
    info!("student {} enrolled in section {}", student_id, section_id);
    Ok(())
}
