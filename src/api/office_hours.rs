use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{
    Created, DayOfWeek, Message, NewOfficeHour, OfficeHourSlot, Role, UpdateOfficeHour,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/office-hours", get(list).post(create))
        .route("/office-hours/{id}", put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    instructor_id: Option<i64>,
    day_filter: Option<DayOfWeek>,
}

async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<OfficeHourSlot>>, AppError> {
    Ok(Json(db::office_hours::list(&state.db, q.instructor_id, q.day_filter).await?))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewOfficeHour>,
) -> Result<Json<Created>, AppError> {
    policy::require_role(&user, &[Role::Instructor])?;
    let id = db::office_hours::insert(&state.db, user.user_id, &req).await?;
    Ok(Json(Created::new("Office hour slot added", id)))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(office_hour_id): Path<i64>,
    Json(req): Json<UpdateOfficeHour>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Instructor])?;
    let owner = db::office_hours::owner_of(&state.db, office_hour_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Slot not found".to_string()))?;
    if owner != user.user_id {
        return Err(AppError::Forbidden(
            "You can only update your own office hours".to_string(),
        ));
    }

    db::office_hours::update(&state.db, office_hour_id, &req).await?;
    Ok(Json(Message::new("Office hour updated")))
}

async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(office_hour_id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Instructor, Role::Admin])?;
    let owner = db::office_hours::owner_of(&state.db, office_hour_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Slot not found".to_string()))?;
    policy::require_self_or(&user, owner, &[Role::Admin])?;

    db::office_hours::delete(&state.db, office_hour_id).await?;
    Ok(Json(Message::new("Office hour slot removed")))
}
