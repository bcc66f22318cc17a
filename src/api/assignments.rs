use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{Assignment, Created, Message, NewAssignment, Role, UpdateAssignment};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assignments", get(list).post(create))
        .route("/assignments/{id}", put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    section_id: Option<i64>,
    student_id: Option<i64>,
}

async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Assignment>>, AppError> {
    let student_id = if user.role == Role::Student {
        Some(user.user_id)
    } else {
        q.student_id
    };

    if let Some(section_id) = q.section_id {
        Ok(Json(db::assignments::list_by_section(&state.db, section_id).await?))
    } else if let Some(student_id) = student_id {
        Ok(Json(db::assignments::list_by_student(&state.db, student_id).await?))
    } else {
        Err(AppError::Validation("section_id or student_id required".to_string()))
    }
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewAssignment>,
) -> Result<Json<Created>, AppError> {
    policy::require_role(&user, &[Role::Instructor, Role::Admin])?;
    if !db::sections::section_exists(&state.db, req.section_id).await? {
        return Err(AppError::NotFound("Section not found".to_string()));
    }
    policy::require_teaches_section(&state.db, &user, req.section_id).await?;

    let id = db::assignments::insert(&state.db, &req).await?;
    Ok(Json(Created::new("Assignment created", id)))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(assignment_id): Path<i64>,
    Json(req): Json<UpdateAssignment>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Instructor, Role::Admin])?;
    let section_id = db::assignments::section_of(&state.db, assignment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;
    policy::require_teaches_section(&state.db, &user, section_id).await?;

    db::assignments::update(&state.db, assignment_id, &req).await?;
    Ok(Json(Message::new("Assignment updated")))
}

async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Instructor, Role::Admin])?;
    let section_id = db::assignments::section_of(&state.db, assignment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))?;
    policy::require_teaches_section(&state.db, &user, section_id).await?;

    db::assignments::delete(&state.db, assignment_id).await?;
    Ok(Json(Message::new("Assignment deleted")))
}
