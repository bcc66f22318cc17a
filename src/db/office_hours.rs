use sqlx::{FromRow, SqlitePool};

use crate::error::AppError;
use crate::models::{DayOfWeek, NewOfficeHour, OfficeHourSlot, UpdateOfficeHour};

pub async fn list(
    db: &SqlitePool,
    instructor_id: Option<i64>,
    day_filter: Option<DayOfWeek>,
) -> Result<Vec<OfficeHourSlot>, AppError> {
    let mut sql = String::from(
        "SELECT oh.office_hour_id, oh.instructor_id, u.full_name, oh.day_of_week,
                oh.start_time, oh.end_time, oh.location
         FROM office_hours oh
         JOIN users u ON oh.instructor_id = u.user_id
         WHERE 1=1",
    );
    if instructor_id.is_some() {
        sql.push_str(" AND oh.instructor_id = ?");
    }
    if day_filter.is_some() {
        sql.push_str(" AND oh.day_of_week = ?");
    }
    sql.push_str(
        " ORDER BY CASE oh.day_of_week
              WHEN 'Monday' THEN 1
              WHEN 'Tuesday' THEN 2
              WHEN 'Wednesday' THEN 3
              WHEN 'Thursday' THEN 4
              WHEN 'Friday' THEN 5
              WHEN 'Saturday' THEN 6
              WHEN 'Sunday' THEN 7
          END,
          oh.start_time ASC",
    );

    let mut query = sqlx::query_as::<_, OfficeHourSlot>(&sql);
    if let Some(id) = instructor_id {
        query = query.bind(id);
    }
    if let Some(day) = day_filter {
        query = query.bind(day);
    }

    Ok(query.fetch_all(db).await?)
}

pub async fn insert(
    db: &SqlitePool,
    instructor_id: i64,
    slot: &NewOfficeHour,
) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO office_hours (instructor_id, day_of_week, start_time, end_time, location)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(instructor_id)
    .bind(slot.day_of_week)
    .bind(slot.start_time)
    .bind(slot.end_time)
    .bind(&slot.location)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn owner_of(db: &SqlitePool, office_hour_id: i64) -> Result<Option<i64>, AppError> {
    let owner =
        sqlx::query_scalar("SELECT instructor_id FROM office_hours WHERE office_hour_id = ?")
            .bind(office_hour_id)
            .fetch_optional(db)
            .await?;
    Ok(owner)
}

#[derive(Debug, FromRow)]
struct SlotRow {
    day_of_week: DayOfWeek,
    start_time: chrono::NaiveTime,
    end_time: chrono::NaiveTime,
    location: String,
}

pub async fn update(
    db: &SqlitePool,
    office_hour_id: i64,
    req: &UpdateOfficeHour,
) -> Result<(), AppError> {
    if req.day_of_week.is_none()
        && req.start_time.is_none()
        && req.end_time.is_none()
        && req.location.is_none()
    {
        return Err(AppError::Validation("No fields provided".to_string()));
    }

    let mut current = sqlx::query_as::<_, SlotRow>(
        "SELECT day_of_week, start_time, end_time, location FROM office_hours WHERE office_hour_id = ?",
    )
    .bind(office_hour_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Slot not found".to_string()))?;

    if let Some(day) = req.day_of_week {
        current.day_of_week = day;
    }
    if let Some(start) = req.start_time {
        current.start_time = start;
    }
    if let Some(end) = req.end_time {
        current.end_time = end;
    }
    if let Some(location) = &req.location {
        current.location = location.clone();
    }

    sqlx::query(
        "UPDATE office_hours SET day_of_week = ?, start_time = ?, end_time = ?, location = ?
         WHERE office_hour_id = ?",
    )
    .bind(current.day_of_week)
    .bind(current.start_time)
    .bind(current.end_time)
    .bind(&current.location)
    .bind(office_hour_id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn delete(db: &SqlitePool, office_hour_id: i64) -> Result<(), AppError> {
    sqlx::query("DELETE FROM office_hours WHERE office_hour_id = ?")
        .bind(office_hour_id)
        .execute(db)
        .await?;
    Ok(())
}
