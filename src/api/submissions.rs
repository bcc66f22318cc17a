use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    routing::{get, post, put},
};
use chrono::Utc;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{
    AssignmentSubmission, Created, GradeRequest, Message, NewSubmission, Role, StudentSubmission,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submissions", post(create))
        .route("/submissions/assignment/{id}", get(list_for_assignment))
        .route("/submissions/student/{id}", get(list_for_student))
        .route("/submissions/{id}/grade", put(grade))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewSubmission>,
) -> Result<Json<Created>, AppError> {
    policy::require_role(&user, &[Role::Student])?;
    let id = db::submissions::create(&state.db, user.user_id, &req, Utc::now()).await?;
    Ok(Json(Created::new("Submission successful", id)))
}

async fn list_for_assignment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<Vec<AssignmentSubmission>>, AppError> {
    let student_scope = (user.role == Role::Student).then_some(user.user_id);
    let rows =
        db::submissions::list_for_assignment(&state.db, assignment_id, student_scope).await?;
    Ok(Json(rows))
}

async fn list_for_student(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(student_id): Path<i64>,
) -> Result<Json<Vec<StudentSubmission>>, AppError> {
    policy::require_self_or(&user, student_id, &[Role::Instructor, Role::Admin])?;
    Ok(Json(db::submissions::list_for_student(&state.db, student_id).await?))
}

async fn grade(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(submission_id): Path<i64>,
    Json(req): Json<GradeRequest>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Instructor, Role::Admin])?;
    db::submissions::grade(&state.db, submission_id, req.grade, req.feedback.as_deref()).await?;
    Ok(Json(Message::new("Submission graded")))
}
