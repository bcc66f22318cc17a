use sqlx::{FromRow, SqlitePool};

use crate::error::AppError;
use crate::models::{
    InstructorProfileView, StudentProfileView, TranscriptEntry, UpdateInstructorProfile,
    UpdateStudentProfile,
};

pub async fn list_students(
    db: &SqlitePool,
    student_id: Option<i64>,
    department: Option<&str>,
) -> Result<Vec<StudentProfileView>, AppError> {
    let mut sql = String::from(
        "SELECT u.full_name, u.email, sp.student_id, sp.admission_year, sp.current_gpa,
                sp.credits_earned, d.name AS department_name
         FROM student_profiles sp
         JOIN users u ON sp.student_id = u.user_id
         LEFT JOIN departments d ON sp.department_id = d.department_id
         WHERE 1=1",
    );
    if student_id.is_some() {
        sql.push_str(" AND sp.student_id = ?");
    }
    if department.is_some() {
        sql.push_str(" AND d.name LIKE ?");
    }

    let mut query = sqlx::query_as::<_, StudentProfileView>(&sql);
    if let Some(id) = student_id {
        query = query.bind(id);
    }
    if let Some(dept) = department {
        query = query.bind(format!("%{dept}%"));
    }

    Ok(query.fetch_all(db).await?)
}

#[derive(Debug, FromRow)]
struct StudentProfileRow {
    department_id: Option<i64>,
    admission_year: Option<i64>,
}

pub async fn update_student(
    db: &SqlitePool,
    student_id: i64,
    req: &UpdateStudentProfile,
) -> Result<(), AppError> {
    if req.department_id.is_none() && req.admission_year.is_none() {
        return Err(AppError::Validation("No fields provided".to_string()));
    }

    let mut current = sqlx::query_as::<_, StudentProfileRow>(
        "SELECT department_id, admission_year FROM student_profiles WHERE student_id = ?",
    )
    .bind(student_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Student profile not found".to_string()))?;

    if let Some(department_id) = req.department_id {
        current.department_id = Some(department_id);
    }
    if let Some(admission_year) = req.admission_year {
        current.admission_year = Some(admission_year);
    }

    sqlx::query(
        "UPDATE student_profiles SET department_id = ?, admission_year = ? WHERE student_id = ?",
    )
    .bind(current.department_id)
    .bind(current.admission_year)
    .bind(student_id)
    .execute(db)
    .await?;

    Ok(())
}

/// Every graded enrollment, the transcript view.
pub async fn transcript(
    db: &SqlitePool,
    student_id: i64,
) -> Result<Vec<TranscriptEntry>, AppError> {
    let rows = sqlx::query_as::<_, TranscriptEntry>(
        "SELECT c.course_code, c.title AS course_name, c.credits, e.grade,
                e.completion_status, s.semester
         FROM enrollments e
         JOIN course_sections s ON e.section_id = s.section_id
         JOIN courses c ON s.course_id = c.course_id
         WHERE e.student_id = ? AND e.grade IS NOT NULL",
    )
    .bind(student_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn current_gpa(db: &SqlitePool, student_id: i64) -> Result<Option<f64>, AppError> {
    let gpa: Option<Option<f64>> =
        sqlx::query_scalar("SELECT current_gpa FROM student_profiles WHERE student_id = ?")
            .bind(student_id)
            .fetch_optional(db)
            .await?;

    match gpa {
        Some(value) => Ok(value),
        None => Err(AppError::NotFound("Student profile not found".to_string())),
    }
}

pub async fn list_instructors(
    db: &SqlitePool,
    instructor_id: Option<i64>,
    department: Option<&str>,
    research: Option<&str>,
    title: Option<&str>,
) -> Result<Vec<InstructorProfileView>, AppError> {
    let mut sql = String::from(
        "SELECT u.full_name, u.email, ip.instructor_id, ip.title, ip.office_location,
                ip.research_interests, d.name AS department_name
         FROM instructor_profiles ip
         JOIN users u ON ip.instructor_id = u.user_id
         LEFT JOIN departments d ON ip.department_id = d.department_id
         WHERE 1=1",
    );
    if instructor_id.is_some() {
        sql.push_str(" AND ip.instructor_id = ?");
    }
    if department.is_some() {
        sql.push_str(" AND d.name LIKE ?");
    }
    if research.is_some() {
        sql.push_str(" AND ip.research_interests LIKE ?");
    }
    if title.is_some() {
        sql.push_str(" AND ip.title LIKE ?");
    }

    let mut query = sqlx::query_as::<_, InstructorProfileView>(&sql);
    if let Some(id) = instructor_id {
        query = query.bind(id);
    }
    if let Some(dept) = department {
        query = query.bind(format!("%{dept}%"));
    }
    if let Some(r) = research {
        query = query.bind(format!("%{r}%"));
    }
    if let Some(t) = title {
        query = query.bind(format!("%{t}%"));
    }

    Ok(query.fetch_all(db).await?)
}

#[derive(Debug, FromRow)]
struct InstructorProfileRow {
    title: Option<String>,
    office_location: Option<String>,
    research_interests: Option<String>,
}

pub async fn update_instructor(
    db: &SqlitePool,
    instructor_id: i64,
    req: &UpdateInstructorProfile,
) -> Result<(), AppError> {
    if req.title.is_none() && req.office_location.is_none() && req.research_interests.is_none() {
        return Err(AppError::Validation("No fields provided".to_string()));
    }

    let mut current = sqlx::query_as::<_, InstructorProfileRow>(
        "SELECT title, office_location, research_interests FROM instructor_profiles WHERE instructor_id = ?",
    )
    .bind(instructor_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Instructor profile not found".to_string()))?;

    if let Some(title) = &req.title {
        current.title = Some(title.clone());
    }
    if let Some(office_location) = &req.office_location {
        current.office_location = Some(office_location.clone());
    }
    if let Some(research_interests) = &req.research_interests {
        current.research_interests = Some(research_interests.clone());
    }

    sqlx::query(
        "UPDATE instructor_profiles SET title = ?, office_location = ?, research_interests = ?
         WHERE instructor_id = ?",
    )
    .bind(&current.title)
    .bind(&current.office_location)
    .bind(&current.research_interests)
    .bind(instructor_id)
    .execute(db)
    .await?;

    Ok(())
}
