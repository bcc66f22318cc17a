use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{AppError, conflict_on_unique};
use crate::models::{AssignmentSubmission, NewSubmission, StudentSubmission};

/// Submission admission: the assignment must exist and be open, the student
/// must be enrolled in its section, and (student, assignment) must be new.
/// The unique index settles a concurrent duplicate.
pub async fn create(
    db: &SqlitePool,
    student_id: i64,
    submission: &NewSubmission,
    now: DateTime<Utc>,
) -> Result<i64, AppError> {
    let mut tx = db.begin().await?;

    let due_date: Option<DateTime<Utc>> =
        sqlx::query_scalar("SELECT due_date FROM assignments WHERE assignment_id = ?")
            .bind(submission.assignment_id)
            .fetch_optional(&mut *tx)
            .await?;
    let due_date = due_date.ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;

    if now > due_date {
        return Err(AppError::Validation("Deadline passed".to_string()));
    }

    let enrolled: i64 = sqlx::query_scalar(
        "SELECT EXISTS(
             SELECT 1 FROM enrollments e
             JOIN assignments a ON e.section_id = a.section_id
             WHERE e.student_id = ? AND a.assignment_id = ?)",
    )
    .bind(student_id)
    .bind(submission.assignment_id)
    .fetch_one(&mut *tx)
    .await?;
    if enrolled == 0 {
        return Err(AppError::Forbidden("Not enrolled in this course".to_string()));
    }

    let result = sqlx::query(
        "INSERT INTO submissions (student_id, assignment_id, submission_text, file_path, submission_date)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(student_id)
    .bind(submission.assignment_id)
    .bind(&submission.submission_text)
    .bind(&submission.file_path)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, "Already submitted"))?;

    let submission_id = result.last_insert_rowid();
    tx.commit().await?;
    Ok(submission_id)
}

/// Submissions for one assignment; `student_scope` narrows students to
/// their own row.
pub async fn list_for_assignment(
    db: &SqlitePool,
    assignment_id: i64,
    student_scope: Option<i64>,
) -> Result<Vec<AssignmentSubmission>, AppError> {
    let mut sql = String::from(
        "SELECT s.submission_id, s.student_id, u.full_name, s.submission_text,
                s.file_path, s.submission_date, s.grade, s.feedback
         FROM submissions s
         JOIN users u ON s.student_id = u.user_id
         WHERE s.assignment_id = ?",
    );
    if student_scope.is_some() {
        sql.push_str(" AND s.student_id = ?");
    }

    let mut query = sqlx::query_as::<_, AssignmentSubmission>(&sql).bind(assignment_id);
    if let Some(id) = student_scope {
        query = query.bind(id);
    }

    Ok(query.fetch_all(db).await?)
}

pub async fn list_for_student(
    db: &SqlitePool,
    student_id: i64,
) -> Result<Vec<StudentSubmission>, AppError> {
    let rows = sqlx::query_as::<_, StudentSubmission>(
        "SELECT s.submission_id, a.title, s.submission_text, s.file_path,
                s.submission_date, s.grade, s.feedback
         FROM submissions s
         JOIN assignments a ON s.assignment_id = a.assignment_id
         WHERE s.student_id = ?",
    )
    .bind(student_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Grading: the value must not exceed the assignment's max score.
pub async fn grade(
    db: &SqlitePool,
    submission_id: i64,
    grade: f64,
    feedback: Option<&str>,
) -> Result<(), AppError> {
    let mut tx = db.begin().await?;

    let max_score: Option<i64> = sqlx::query_scalar(
        "SELECT a.max_score
         FROM submissions s
         JOIN assignments a ON s.assignment_id = a.assignment_id
         WHERE s.submission_id = ?",
    )
    .bind(submission_id)
    .fetch_optional(&mut *tx)
    .await?;
    let max_score =
        max_score.ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

    if grade > max_score as f64 {
        return Err(AppError::Validation(format!(
            "Grade exceeds max score {max_score}"
        )));
    }

    sqlx::query("UPDATE submissions SET grade = ?, feedback = ? WHERE submission_id = ?")
        .bind(grade)
        .bind(feedback)
        .bind(submission_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
