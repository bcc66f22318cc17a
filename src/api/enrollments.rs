use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{EnrollRequest, EnrollmentDetail, Message, Role, UpdateEnrollment};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/enrollments", get(list).post(enroll))
        .route("/enrollments/{id}", put(update).delete(drop_enrollment))
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
) -> Result<Json<Vec<EnrollmentDetail>>, AppError> {
    let student_id = if user.role == Role::Student {
        Some(user.user_id)
    } else {
        q.student_id
    };
    Ok(Json(db::enrollments::list(&state.db, q.section_id, student_id).await?))
}

async fn enroll(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<EnrollRequest>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Student])?;
    services::enrollment::enroll(&state.db, user.user_id, req.section_id).await?;
    Ok(Json(Message::new("Enrollment successful")))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(enrollment_id): Path<i64>,
    Json(req): Json<UpdateEnrollment>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Instructor, Role::Admin])?;
    db::enrollments::update(&state.db, enrollment_id, &req).await?;
    Ok(Json(Message::new("Enrollment updated")))
}

async fn drop_enrollment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(enrollment_id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    let owner = db::enrollments::owner_of(&state.db, enrollment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

    policy::require_self_or(&user, owner, &[Role::Instructor, Role::Admin])?;

    db::enrollments::delete(&state.db, enrollment_id).await?;
    Ok(Json(Message::new("Enrollment dropped")))
}
