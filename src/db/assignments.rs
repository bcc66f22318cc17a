use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{Assignment, NewAssignment, UpdateAssignment};

/// Weight budget for one section's assignments, in percent.
pub const WEIGHT_BUDGET: f64 = 100.0;

pub async fn list_by_section(
    db: &SqlitePool,
    section_id: i64,
) -> Result<Vec<Assignment>, AppError> {
    let rows = sqlx::query_as::<_, Assignment>(
        "SELECT assignment_id, section_id, title, description, due_date, max_score, weight
         FROM assignments WHERE section_id = ? ORDER BY due_date ASC",
    )
    .bind(section_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Assignments across every section the student is enrolled in.
pub async fn list_by_student(
    db: &SqlitePool,
    student_id: i64,
) -> Result<Vec<Assignment>, AppError> {
    let rows = sqlx::query_as::<_, Assignment>(
        "SELECT a.assignment_id, a.section_id, a.title, a.description, a.due_date, a.max_score, a.weight
         FROM assignments a
         JOIN enrollments e ON a.section_id = e.section_id
         WHERE e.student_id = ?
         ORDER BY a.due_date ASC",
    )
    .bind(student_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn section_of(db: &SqlitePool, assignment_id: i64) -> Result<Option<i64>, AppError> {
    let section = sqlx::query_scalar("SELECT section_id FROM assignments WHERE assignment_id = ?")
        .bind(assignment_id)
        .fetch_optional(db)
        .await?;
    Ok(section)
}

/// Creates an assignment, holding the section's weight sum within budget.
pub async fn insert(db: &SqlitePool, assignment: &NewAssignment) -> Result<i64, AppError> {
    let mut tx = db.begin().await?;

    let committed: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(weight), 0.0) FROM assignments WHERE section_id = ?",
    )
    .bind(assignment.section_id)
    .fetch_one(&mut *tx)
    .await?;

    if committed + assignment.weight > WEIGHT_BUDGET {
        return Err(AppError::Conflict("Total weight exceeds 100%".to_string()));
    }

    let result = sqlx::query(
        "INSERT INTO assignments (section_id, title, description, due_date, max_score, weight)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(assignment.section_id)
    .bind(&assignment.title)
    .bind(&assignment.description)
    .bind(assignment.due_date)
    .bind(assignment.max_score)
    .bind(assignment.weight)
    .execute(&mut *tx)
    .await?;

    let assignment_id = result.last_insert_rowid();
    tx.commit().await?;
    Ok(assignment_id)
}

/// Sparse update. A new weight is checked against the sum of the *other*
/// assignments in the section.
pub async fn update(
    db: &SqlitePool,
    assignment_id: i64,
    req: &UpdateAssignment,
) -> Result<(), AppError> {
    if req.title.is_none()
        && req.description.is_none()
        && req.due_date.is_none()
        && req.max_score.is_none()
        && req.weight.is_none()
    {
        return Err(AppError::Validation("No fields provided".to_string()));
    }

    let mut tx = db.begin().await?;

    let mut current = sqlx::query_as::<_, Assignment>(
        "SELECT assignment_id, section_id, title, description, due_date, max_score, weight
         FROM assignments WHERE assignment_id = ?",
    )
    .bind(assignment_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

    if let Some(weight) = req.weight {
        let others: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(weight), 0.0) FROM assignments WHERE section_id = ? AND assignment_id <> ?",
        )
        .bind(current.section_id)
        .bind(assignment_id)
        .fetch_one(&mut *tx)
        .await?;

        if others + weight > WEIGHT_BUDGET {
            return Err(AppError::Conflict("Total weight exceeds 100%".to_string()));
        }
        current.weight = weight;
    }
    if let Some(title) = &req.title {
        current.title = title.clone();
    }
    if let Some(description) = &req.description {
        current.description = Some(description.clone());
    }
    if let Some(due_date) = req.due_date {
        current.due_date = due_date;
    }
    if let Some(max_score) = req.max_score {
        current.max_score = max_score;
    }

    sqlx::query(
        "UPDATE assignments SET title = ?, description = ?, due_date = ?, max_score = ?, weight = ?
         WHERE assignment_id = ?",
    )
    .bind(&current.title)
    .bind(&current.description)
    .bind(current.due_date)
    .bind(current.max_score)
    .bind(current.weight)
    .bind(assignment_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn delete(db: &SqlitePool, assignment_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM assignments WHERE assignment_id = ?")
        .bind(assignment_id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Assignment not found".to_string()));
    }
    Ok(())
}
