use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, conflict_on_unique};
use crate::models::{NewSection, SectionOverview, UpdateSection};

pub async fn list(
    db: &SqlitePool,
    semester: Option<&str>,
    course_code: Option<&str>,
) -> Result<Vec<SectionOverview>, AppError> {
    let mut sql = String::from(
        "SELECT s.section_id, c.course_code, c.title AS course_name, s.semester, s.year,
                s.schedule_day, s.schedule_time, s.classroom, s.capacity,
                u.full_name AS instructor_name,
                (SELECT COUNT(*) FROM enrollments e WHERE e.section_id = s.section_id) AS current_enrolled
         FROM course_sections s
         JOIN courses c ON s.course_id = c.course_id
         LEFT JOIN users u ON s.instructor_id = u.user_id
         WHERE 1=1",
    );
    if semester.is_some() {
        sql.push_str(" AND s.semester = ?");
    }
    if course_code.is_some() {
        sql.push_str(" AND c.course_code = ?");
    }

    let mut query = sqlx::query_as::<_, SectionOverview>(&sql);
    if let Some(s) = semester {
        query = query.bind(s.to_string());
    }
    if let Some(cc) = course_code {
        query = query.bind(cc.to_string());
    }

    Ok(query.fetch_all(db).await?)
}

async fn slot_taken<'e, E>(
    executor: E,
    semester: &str,
    year: i64,
    schedule_day: &str,
    schedule_time: &str,
    classroom: &str,
    exclude_section: Option<i64>,
) -> Result<bool, AppError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let mut sql = String::from(
        "SELECT section_id FROM course_sections
         WHERE semester = ? AND year = ? AND schedule_day = ? AND schedule_time = ? AND classroom = ?",
    );
    if exclude_section.is_some() {
        sql.push_str(" AND section_id <> ?");
    }

    let mut query = sqlx::query_scalar::<_, i64>(&sql)
        .bind(semester.to_string())
        .bind(year)
        .bind(schedule_day.to_string())
        .bind(schedule_time.to_string())
        .bind(classroom.to_string());
    if let Some(id) = exclude_section {
        query = query.bind(id);
    }

    Ok(query.fetch_optional(executor).await?.is_some())
}

/// Creates a section. The schedule tuple is pre-checked for a friendly
/// error; the unique index resolves an insert race the same way.
pub async fn insert(db: &SqlitePool, section: &NewSection) -> Result<i64, AppError> {
    let mut tx = db.begin().await?;

    let course_id: Option<i64> =
        sqlx::query_scalar("SELECT course_id FROM courses WHERE course_code = ?")
            .bind(&section.course_code)
            .fetch_optional(&mut *tx)
            .await?;
    let course_id =
        course_id.ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    if slot_taken(
        &mut *tx,
        &section.semester,
        section.year,
        &section.schedule_day,
        &section.schedule_time,
        &section.classroom,
        None,
    )
    .await?
    {
        return Err(AppError::Conflict("Classroom conflict".to_string()));
    }

    let result = sqlx::query(
        "INSERT INTO course_sections
             (course_id, instructor_id, semester, year, schedule_day, schedule_time, classroom, capacity)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(course_id)
    .bind(section.instructor_id)
    .bind(&section.semester)
    .bind(section.year)
    .bind(&section.schedule_day)
    .bind(&section.schedule_time)
    .bind(&section.classroom)
    .bind(section.capacity)
    .execute(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, "Classroom conflict"))?;

    let section_id = result.last_insert_rowid();
    tx.commit().await?;
    Ok(section_id)
}

#[derive(Debug, FromRow)]
struct SectionRow {
    semester: String,
    year: i64,
    schedule_day: String,
    schedule_time: String,
    classroom: String,
    capacity: i64,
    instructor_id: Option<i64>,
}

/// Sparse update. Unset fields keep their current values, which also
/// defines the tuple used for the conflict check; the section itself is
/// excluded from that check so an unchanged slot never self-conflicts.
pub async fn update(
    db: &SqlitePool,
    section_id: i64,
    req: &UpdateSection,
) -> Result<(), AppError> {
    if req.classroom.is_none() && req.capacity.is_none() && req.instructor_id.is_none() {
        return Err(AppError::Validation("No fields provided".to_string()));
    }

    let mut tx = db.begin().await?;

    let mut current = sqlx::query_as::<_, SectionRow>(
        "SELECT semester, year, schedule_day, schedule_time, classroom, capacity, instructor_id
         FROM course_sections WHERE section_id = ?",
    )
    .bind(section_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Section not found".to_string()))?;

    if let Some(classroom) = &req.classroom {
        current.classroom = classroom.clone();
    }
    if let Some(capacity) = req.capacity {
        current.capacity = capacity;
    }
    if let Some(instructor_id) = req.instructor_id {
        current.instructor_id = Some(instructor_id);
    }

    if slot_taken(
        &mut *tx,
        &current.semester,
        current.year,
        &current.schedule_day,
        &current.schedule_time,
        &current.classroom,
        Some(section_id),
    )
    .await?
    {
        return Err(AppError::Conflict("Classroom conflict".to_string()));
    }

    sqlx::query(
        "UPDATE course_sections SET classroom = ?, capacity = ?, instructor_id = ? WHERE section_id = ?",
    )
    .bind(&current.classroom)
    .bind(current.capacity)
    .bind(current.instructor_id)
    .bind(section_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, "Classroom conflict"))?;

    tx.commit().await?;
    Ok(())
}

/// Deletion is refused once students are enrolled.
pub async fn delete(db: &SqlitePool, section_id: i64) -> Result<(), AppError> {
    let enrolled: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE section_id = ?")
            .bind(section_id)
            .fetch_one(db)
            .await?;
    if enrolled > 0 {
        return Err(AppError::Conflict("Students already enrolled".to_string()));
    }

    let result = sqlx::query("DELETE FROM course_sections WHERE section_id = ?")
        .bind(section_id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Section not found".to_string()));
    }
    Ok(())
}

pub async fn section_exists(db: &SqlitePool, section_id: i64) -> Result<bool, AppError> {
    let found: i64 =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM course_sections WHERE section_id = ?)")
            .bind(section_id)
            .fetch_one(db)
            .await?;
    Ok(found == 1)
}
