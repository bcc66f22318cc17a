//! Derived GPA and credit totals. Both are a pure function of the graded
//! enrollments joined to course credits, recomputed on demand and written
//! back onto the student profile.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::AppError;
use crate::models::GpaSummary;

/// Credit-weighted mean over (grade, credits) pairs, with the earned
/// credit total. 0.0 when no credits have been earned.
pub fn weighted_gpa(rows: &[(f64, f64)]) -> (f64, f64) {
    let total_credits: f64 = rows.iter().map(|(_, credits)| credits).sum();
    if total_credits <= 0.0 {
        return (0.0, 0.0);
    }
    let total_points: f64 = rows.iter().map(|(grade, credits)| grade * credits).sum();
    (round2(total_points / total_credits), total_credits)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Recomputes and persists the student's GPA and earned credits.
/// Idempotent: unchanged inputs produce the same persisted values.
/// Returns `None` when the student has no graded enrollments; nothing is
/// persisted in that case.
pub async fn recompute(
    db: &SqlitePool,
    student_id: i64,
) -> Result<Option<GpaSummary>, AppError> {
    let rows: Vec<(f64, f64)> = sqlx::query_as(
        "SELECT e.grade, c.credits
         FROM enrollments e
         JOIN course_sections s ON e.section_id = s.section_id
         JOIN courses c ON s.course_id = c.course_id
         WHERE e.student_id = ? AND e.grade IS NOT NULL",
    )
    .bind(student_id)
    .fetch_all(db)
    .await?;

    if rows.is_empty() {
        return Ok(None);
    }

    let (gpa, credits_earned) = weighted_gpa(&rows);

    let result = sqlx::query(
        "UPDATE student_profiles SET current_gpa = ?, credits_earned = ? WHERE student_id = ?",
    )
    .bind(gpa)
    .bind(credits_earned)
    .bind(student_id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Student profile not found".to_string()));
    }

    info!("recomputed gpa for student {}: {} ({} credits)", student_id, gpa, credits_earned);
    Ok(Some(GpaSummary { student_id, gpa, credits_earned }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_mean_rounds_to_two_decimals() {
        // (3.0 × 3 + 2.0 × 4) / 7 = 17/7 = 2.4285… → 2.43
        let (gpa, credits) = weighted_gpa(&[(3.0, 3.0), (2.0, 4.0)]);
        assert_eq!(gpa, 2.43);
        assert_eq!(credits, 7.0);
    }

    #[test]
    fn no_credits_means_zero_gpa() {
        assert_eq!(weighted_gpa(&[]), (0.0, 0.0));
    }

    #[test]
    fn recomputing_unchanged_inputs_is_stable() {
        let rows = [(3.5, 3.0), (1.0, 2.0), (4.0, 5.0)];
        assert_eq!(weighted_gpa(&rows), weighted_gpa(&rows));
    }
}
