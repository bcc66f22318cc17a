use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{Announcement, NewAnnouncement, UpdateAnnouncement};

pub async fn list_for_section(
    db: &SqlitePool,
    section_id: i64,
) -> Result<Vec<Announcement>, AppError> {
    let rows = sqlx::query_as::<_, Announcement>(
        "SELECT announcement_id, section_id, title, content, publish_date
         FROM announcements
         WHERE section_id = ?
         ORDER BY publish_date DESC",
    )
    .bind(section_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(db: &SqlitePool, post: &NewAnnouncement) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO announcements (section_id, title, content, publish_date) VALUES (?, ?, ?, ?)",
    )
    .bind(post.section_id)
    .bind(&post.title)
    .bind(&post.content)
    .bind(Utc::now())
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn section_of(db: &SqlitePool, announcement_id: i64) -> Result<Option<i64>, AppError> {
    let section =
        sqlx::query_scalar("SELECT section_id FROM announcements WHERE announcement_id = ?")
            .bind(announcement_id)
            .fetch_optional(db)
            .await?;
    Ok(section)
}

pub async fn update(
    db: &SqlitePool,
    announcement_id: i64,
    req: &UpdateAnnouncement,
) -> Result<(), AppError> {
    if req.title.is_none() && req.content.is_none() {
        return Err(AppError::Validation("No fields provided".to_string()));
    }

    let mut current = sqlx::query_as::<_, Announcement>(
        "SELECT announcement_id, section_id, title, content, publish_date
         FROM announcements WHERE announcement_id = ?",
    )
    .bind(announcement_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;

    if let Some(title) = &req.title {
        current.title = title.clone();
    }
    if let Some(content) = &req.content {
        current.content = content.clone();
    }

    sqlx::query("UPDATE announcements SET title = ?, content = ? WHERE announcement_id = ?")
        .bind(&current.title)
        .bind(&current.content)
        .bind(announcement_id)
        .execute(db)
        .await?;

    Ok(())
}

pub async fn delete(db: &SqlitePool, announcement_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM announcements WHERE announcement_id = ?")
        .bind(announcement_id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Announcement not found".to_string()));
    }
    Ok(())
}
