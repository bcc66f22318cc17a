use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    routing::{delete, get, post, put},
};
use serde::Deserialize;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{
    CourseSummary, Created, Message, NewCourse, NewPrerequisite, Prerequisite, Role, TaughtCourse,
    UpdateCourse,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list).post(create))
        .route("/courses/teaching-history/{instructor_id}", get(teaching_history))
        .route("/courses/{code}", put(update).delete(remove))
        .route("/prerequisites", post(add_prerequisite))
        .route("/prerequisites/{code}", get(list_prerequisites))
        .route("/prerequisites/{code}/{prerequisite_code}", delete(remove_prerequisite))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    department_id: Option<i64>,
}

async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    Ok(Json(db::courses::list(&state.db, q.department_id).await?))
}

async fn teaching_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(instructor_id): Path<i64>,
) -> Result<Json<Vec<TaughtCourse>>, AppError> {
    policy::require_role(&user, &[Role::Instructor, Role::Admin])?;
    policy::require_self_or(&user, instructor_id, &[Role::Admin])?;
    Ok(Json(db::courses::teaching_history(&state.db, instructor_id).await?))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewCourse>,
) -> Result<Json<Created>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    let id = db::courses::insert(&state.db, &req).await?;
    Ok(Json(Created::new("Course created", id)))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(course_code): Path<String>,
    Json(req): Json<UpdateCourse>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    db::courses::update(&state.db, &course_code, &req).await?;
    Ok(Json(Message::new("Course updated")))
}

async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(course_code): Path<String>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    db::courses::delete(&state.db, &course_code).await?;
    Ok(Json(Message::new("Course deleted")))
}

async fn list_prerequisites(
    State(state): State<AppState>,
    Path(course_code): Path<String>,
) -> Result<Json<Vec<Prerequisite>>, AppError> {
    Ok(Json(db::courses::prerequisites_of(&state.db, &course_code).await?))
}

async fn add_prerequisite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewPrerequisite>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    db::courses::add_prerequisite(&state.db, &req).await?;
    Ok(Json(Message::new("Prerequisite added")))
}

async fn remove_prerequisite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((course_code, prerequisite_code)): Path<(String, String)>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    db::courses::remove_prerequisite(&state.db, &course_code, &prerequisite_code).await?;
    Ok(Json(Message::new("Prerequisite deleted")))
}
