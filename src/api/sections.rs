use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{Created, Message, NewSection, Role, SectionOverview, UpdateSection};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sections", get(list).post(create))
        .route("/sections/{id}", put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    semester: Option<String>,
    course_code: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<SectionOverview>>, AppError> {
    let rows =
        db::sections::list(&state.db, q.semester.as_deref(), q.course_code.as_deref()).await?;
    Ok(Json(rows))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewSection>,
) -> Result<Json<Created>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    let id = db::sections::insert(&state.db, &req).await?;
    Ok(Json(Created::new("Section created", id)))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(section_id): Path<i64>,
    Json(req): Json<UpdateSection>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    db::sections::update(&state.db, section_id, &req).await?;
    Ok(Json(Message::new("Section updated")))
}

async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(section_id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    db::sections::delete(&state.db, section_id).await?;
    Ok(Json(Message::new("Section deleted")))
}
