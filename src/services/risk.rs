//! Composite at-risk heuristic: GPA shortfall, absence ratio and missed
//! submissions. The aggregates come from SQL; the scoring is a pure
//! function so each term's zero-denominator default stays visible.

use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::AtRiskStudent;

/// `0.45 × max(0, 2.5 − gpa) + 0.35 × absence ratio + 0.20 × missed
/// submission ratio`, rounded to 4 decimals. Each term defaults to 0 when
/// its denominator is 0, and the GPA term to 0 when GPA is unknown.
pub fn risk_score(
    gpa: Option<f64>,
    total_classes: i64,
    absences: i64,
    total_assignments: i64,
    submitted: i64,
) -> f64 {
    let gpa_term = match gpa {
        Some(g) => (2.5 - g).max(0.0),
        None => 0.0,
    };
    let absence_term = if total_classes == 0 {
        0.0
    } else {
        absences as f64 / total_classes as f64
    };
    let missed_term = if total_assignments == 0 {
        0.0
    } else {
        (total_assignments - submitted) as f64 / total_assignments as f64
    };

    round4(0.45 * gpa_term + 0.35 * absence_term + 0.20 * missed_term)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Active students of one semester, scored and ordered by descending risk.
pub async fn top_risk_students(
    db: &SqlitePool,
    semester: &str,
    limit: usize,
) -> Result<Vec<AtRiskStudent>, AppError> {
    let rows = db::reports::risk_aggregates(db, semester).await?;

    let mut scored: Vec<AtRiskStudent> = rows
        .into_iter()
        .map(|r| AtRiskStudent {
            risk_score: risk_score(
                r.current_gpa,
                r.total_classes,
                r.absences,
                r.total_assignments,
                r.submitted,
            ),
            student_id: r.student_id,
            full_name: r.full_name,
            current_gpa: r.current_gpa,
            avg_grade: r.avg_grade,
        })
        .collect();

    scored.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(limit);
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_score_matches_reference_example() {
        // 0.45 × 0.5 + 0.35 × 0.2 + 0.20 × 0.25 = 0.345
        assert_eq!(risk_score(Some(2.0), 10, 2, 4, 3), 0.345);
    }

    #[test]
    fn unknown_gpa_zeroes_the_gpa_term() {
        assert_eq!(risk_score(None, 10, 2, 4, 3), 0.12);
    }

    #[test]
    fn zero_denominators_zero_their_terms() {
        assert_eq!(risk_score(Some(2.0), 0, 0, 0, 0), 0.225);
        assert_eq!(risk_score(None, 0, 0, 0, 0), 0.0);
    }

    #[test]
    fn gpa_above_threshold_contributes_nothing() {
        assert_eq!(risk_score(Some(3.8), 0, 0, 0, 0), 0.0);
    }
}
