use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{Announcement, Created, Message, NewAnnouncement, Role, UpdateAnnouncement};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/announcements", get(list).post(create))
        .route("/announcements/{id}", put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    section_id: i64,
}

async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Announcement>>, AppError> {
    if user.role == Role::Student
        && !db::enrollments::is_enrolled(&state.db, user.user_id, q.section_id).await?
    {
        return Err(AppError::Forbidden(
            "You are not enrolled in this section".to_string(),
        ));
    }

    Ok(Json(db::announcements::list_for_section(&state.db, q.section_id).await?))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewAnnouncement>,
) -> Result<Json<Created>, AppError> {
    policy::require_role(&user, &[Role::Instructor, Role::Admin])?;
    policy::require_teaches_section(&state.db, &user, req.section_id).await?;

    let id = db::announcements::insert(&state.db, &req).await?;
    Ok(Json(Created::new("Announcement posted", id)))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(announcement_id): Path<i64>,
    Json(req): Json<UpdateAnnouncement>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Instructor, Role::Admin])?;
    let section_id = db::announcements::section_of(&state.db, announcement_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;
    policy::require_teaches_section(&state.db, &user, section_id).await?;

    db::announcements::update(&state.db, announcement_id, &req).await?;
    Ok(Json(Message::new("Announcement updated")))
}

async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(announcement_id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Instructor, Role::Admin])?;
    let section_id = db::announcements::section_of(&state.db, announcement_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Announcement not found".to_string()))?;
    policy::require_teaches_section(&state.db, &user, section_id).await?;

    db::announcements::delete(&state.db, announcement_id).await?;
    Ok(Json(Message::new("Announcement deleted")))
}
