use sqlx::SqlitePool;

use crate::error::{AppError, conflict_on_unique};
use crate::models::{
    Course, CourseSummary, NewCourse, NewPrerequisite, Prerequisite, TaughtCourse, UpdateCourse,
};

pub async fn list(
    db: &SqlitePool,
    department_id: Option<i64>,
) -> Result<Vec<CourseSummary>, AppError> {
    let mut sql = String::from(
        "SELECT c.course_code, c.title, c.credits, c.description, d.name AS department_name
         FROM courses c
         LEFT JOIN departments d ON c.department_id = d.department_id",
    );
    if department_id.is_some() {
        sql.push_str(" WHERE c.department_id = ?");
    }

    let mut query = sqlx::query_as::<_, CourseSummary>(&sql);
    if let Some(id) = department_id {
        query = query.bind(id);
    }

    Ok(query.fetch_all(db).await?)
}

pub async fn find_id_by_code(db: &SqlitePool, course_code: &str) -> Result<Option<i64>, AppError> {
    let id = sqlx::query_scalar("SELECT course_id FROM courses WHERE course_code = ?")
        .bind(course_code)
        .fetch_optional(db)
        .await?;
    Ok(id)
}

pub async fn teaching_history(
    db: &SqlitePool,
    instructor_id: i64,
) -> Result<Vec<TaughtCourse>, AppError> {
    let rows = sqlx::query_as::<_, TaughtCourse>(
        "SELECT DISTINCT c.course_code, c.title, c.credits
         FROM courses c
         JOIN course_sections cs ON c.course_id = cs.course_id
         WHERE cs.instructor_id = ?",
    )
    .bind(instructor_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(db: &SqlitePool, course: &NewCourse) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO courses (course_code, title, department_id, credits, description) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&course.course_code)
    .bind(&course.title)
    .bind(course.department_id)
    .bind(course.credits)
    .bind(&course.description)
    .execute(db)
    .await
    .map_err(|e| conflict_on_unique(e, "Course code already exists"))?;

    Ok(result.last_insert_rowid())
}

pub async fn update(
    db: &SqlitePool,
    course_code: &str,
    req: &UpdateCourse,
) -> Result<(), AppError> {
    if req.title.is_none()
        && req.credits.is_none()
        && req.description.is_none()
        && req.department_id.is_none()
    {
        return Err(AppError::Validation("No fields provided".to_string()));
    }

    let mut current = sqlx::query_as::<_, Course>(
        "SELECT course_id, course_code, title, department_id, credits, description FROM courses WHERE course_code = ?",
    )
    .bind(course_code)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    if let Some(title) = &req.title {
        current.title = title.clone();
    }
    if let Some(credits) = req.credits {
        current.credits = credits;
    }
    if let Some(description) = &req.description {
        current.description = Some(description.clone());
    }
    if let Some(department_id) = req.department_id {
        current.department_id = department_id;
    }

    sqlx::query(
        "UPDATE courses SET title = ?, credits = ?, description = ?, department_id = ? WHERE course_code = ?",
    )
    .bind(&current.title)
    .bind(current.credits)
    .bind(&current.description)
    .bind(current.department_id)
    .bind(course_code)
    .execute(db)
    .await?;

    Ok(())
}

/// Deletion is refused while the course has sections or is someone's
/// prerequisite.
pub async fn delete(db: &SqlitePool, course_code: &str) -> Result<(), AppError> {
    let sections: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM course_sections cs JOIN courses c ON cs.course_id = c.course_id WHERE c.course_code = ?",
    )
    .bind(course_code)
    .fetch_one(db)
    .await?;
    if sections > 0 {
        return Err(AppError::Conflict("Course has sections".to_string()));
    }

    let referenced: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM course_prerequisites p JOIN courses c ON p.prerequisite_id = c.course_id WHERE c.course_code = ?",
    )
    .bind(course_code)
    .fetch_one(db)
    .await?;
    if referenced > 0 {
        return Err(AppError::Conflict("Course is a prerequisite".to_string()));
    }

    let result = sqlx::query("DELETE FROM courses WHERE course_code = ?")
        .bind(course_code)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Course not found".to_string()));
    }
    Ok(())
}

pub async fn prerequisites_of(
    db: &SqlitePool,
    course_code: &str,
) -> Result<Vec<Prerequisite>, AppError> {
    let rows = sqlx::query_as::<_, Prerequisite>(
        "SELECT prereq.course_code, prereq.title
         FROM course_prerequisites p
         JOIN courses main ON p.course_id = main.course_id
         JOIN courses prereq ON p.prerequisite_id = prereq.course_id
         WHERE main.course_code = ?",
    )
    .bind(course_code)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn add_prerequisite(db: &SqlitePool, req: &NewPrerequisite) -> Result<(), AppError> {
    if req.course_code == req.prerequisite_code {
        return Err(AppError::Validation(
            "Course cannot be prerequisite of itself".to_string(),
        ));
    }

    let course_id = find_id_by_code(db, &req.course_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Course code not found".to_string()))?;
    let prerequisite_id = find_id_by_code(db, &req.prerequisite_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Course code not found".to_string()))?;

    sqlx::query("INSERT INTO course_prerequisites (course_id, prerequisite_id) VALUES (?, ?)")
        .bind(course_id)
        .bind(prerequisite_id)
        .execute(db)
        .await
        .map_err(|e| conflict_on_unique(e, "Prerequisite already exists"))?;

    Ok(())
}

pub async fn remove_prerequisite(
    db: &SqlitePool,
    course_code: &str,
    prerequisite_code: &str,
) -> Result<(), AppError> {
    let course_id = find_id_by_code(db, course_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Course code not found".to_string()))?;
    let prerequisite_id = find_id_by_code(db, prerequisite_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Course code not found".to_string()))?;

    let result = sqlx::query(
        "DELETE FROM course_prerequisites WHERE course_id = ? AND prerequisite_id = ?",
    )
    .bind(course_id)
    .bind(prerequisite_id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Prerequisite link not found".to_string()));
    }
    Ok(())
}
