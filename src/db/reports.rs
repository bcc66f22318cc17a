//! Read-only statistical rollups behind the analytics surface.

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{CourseDifficultyRow, InstructorWorkloadRow, RiskAggregateRow};

/// Per-instructor load and success ratio over Completed enrollments.
pub async fn instructor_workload(
    db: &SqlitePool,
    min_students: i64,
    limit: i64,
) -> Result<Vec<InstructorWorkloadRow>, AppError> {
    let rows = sqlx::query_as::<_, InstructorWorkloadRow>(
        "WITH instructor_load AS (
             SELECT s.instructor_id,
                    COUNT(DISTINCT s.section_id) AS sections_taught,
                    COUNT(e.student_id) AS total_students
             FROM course_sections s
             LEFT JOIN enrollments e ON s.section_id = e.section_id
             GROUP BY s.instructor_id
         ),
         performance AS (
             SELECT s.instructor_id,
                    AVG(CASE WHEN e.grade >= 2.0 THEN 1.0 ELSE 0.0 END) AS success_ratio
             FROM course_sections s
             JOIN enrollments e ON s.section_id = e.section_id
             WHERE e.completion_status = 'Completed'
             GROUP BY s.instructor_id
         )
         SELECT u.user_id AS instructor_id,
                u.full_name,
                il.sections_taught,
                il.total_students,
                ROUND(COALESCE(p.success_ratio, 0) * 100, 2) AS success_percentage
         FROM instructor_load il
         JOIN users u ON il.instructor_id = u.user_id
         LEFT JOIN performance p ON il.instructor_id = p.instructor_id
         WHERE il.total_students >= ?
         ORDER BY success_percentage DESC, il.total_students DESC
         LIMIT ?",
    )
    .bind(min_students)
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Failure rate per course over Completed enrollments; a failure is a
/// grade below 1.0.
pub async fn course_difficulty(
    db: &SqlitePool,
    min_students: i64,
    limit: i64,
) -> Result<Vec<CourseDifficultyRow>, AppError> {
    let rows = sqlx::query_as::<_, CourseDifficultyRow>(
        "WITH course_results AS (
             SELECT c.course_id,
                    c.course_code,
                    c.title,
                    COUNT(e.enrollment_id) AS total_students,
                    SUM(CASE WHEN e.grade < 1.0 THEN 1 ELSE 0 END) AS failures
             FROM courses c
             JOIN course_sections s ON c.course_id = s.course_id
             JOIN enrollments e ON s.section_id = e.section_id
             WHERE e.completion_status = 'Completed'
             GROUP BY c.course_id, c.course_code, c.title
         )
         SELECT course_code,
                title,
                total_students,
                failures,
                ROUND((failures * 100.0) / total_students, 2) AS failure_rate
         FROM course_results
         WHERE total_students >= ?
         ORDER BY failure_rate DESC, total_students DESC
         LIMIT ?",
    )
    .bind(min_students)
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Per-student semester aggregates feeding the risk score: attendance and
/// assignment-submission sums over the sections the student is enrolled in,
/// plus profile GPA and the semester's average grade. Scoring happens in
/// [`crate::services::risk`].
pub async fn risk_aggregates(
    db: &SqlitePool,
    semester: &str,
) -> Result<Vec<RiskAggregateRow>, AppError> {
    let rows = sqlx::query_as::<_, RiskAggregateRow>(
        "WITH enrolled AS (
             SELECT e.student_id, e.section_id
             FROM enrollments e
             JOIN course_sections cs ON cs.section_id = e.section_id
             WHERE cs.semester = ?1
         ),
         att AS (
             SELECT a.student_id, a.section_id,
                    COUNT(*) AS total_classes,
                    SUM(CASE WHEN a.status = 'Absent' THEN 1 ELSE 0 END) AS absences
             FROM attendance a
             JOIN enrolled en ON en.student_id = a.student_id AND en.section_id = a.section_id
             GROUP BY a.student_id, a.section_id
         ),
         asg AS (
             SELECT a.section_id, COUNT(*) AS total_assignments
             FROM assignments a
             JOIN course_sections cs ON cs.section_id = a.section_id
             WHERE cs.semester = ?1
             GROUP BY a.section_id
         ),
         sub AS (
             SELECT s.student_id, a.section_id, COUNT(*) AS submitted
             FROM submissions s
             JOIN assignments a ON a.assignment_id = s.assignment_id
             JOIN course_sections cs ON cs.section_id = a.section_id
             WHERE cs.semester = ?1
             GROUP BY s.student_id, a.section_id
         ),
         grades AS (
             SELECT e.student_id, AVG(e.grade) AS avg_grade
             FROM enrollments e
             JOIN course_sections cs ON cs.section_id = e.section_id
             WHERE cs.semester = ?1
             GROUP BY e.student_id
         ),
         per_section AS (
             SELECT en.student_id, en.section_id,
                    COALESCE(att.total_classes, 0) AS total_classes,
                    COALESCE(att.absences, 0) AS absences,
                    COALESCE(asg.total_assignments, 0) AS total_assignments,
                    COALESCE(sub.submitted, 0) AS submitted
             FROM enrolled en
             LEFT JOIN att ON att.student_id = en.student_id AND att.section_id = en.section_id
             LEFT JOIN asg ON asg.section_id = en.section_id
             LEFT JOIN sub ON sub.student_id = en.student_id AND sub.section_id = en.section_id
         ),
         per_student AS (
             SELECT ps.student_id,
                    SUM(ps.total_classes) AS total_classes,
                    SUM(ps.absences) AS absences,
                    SUM(ps.total_assignments) AS total_assignments,
                    SUM(ps.submitted) AS submitted
             FROM per_section ps
             GROUP BY ps.student_id
         )
         SELECT u.user_id AS student_id,
                u.full_name,
                sp.current_gpa,
                g.avg_grade,
                st.total_classes,
                st.absences,
                st.total_assignments,
                st.submitted
         FROM per_student st
         JOIN users u ON u.user_id = st.student_id
         LEFT JOIN student_profiles sp ON sp.student_id = u.user_id
         LEFT JOIN grades g ON g.student_id = u.user_id
         WHERE u.role = 'Student' AND u.is_active = 1",
    )
    .bind(semester)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
