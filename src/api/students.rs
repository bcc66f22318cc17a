use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    routing::{get, post, put},
};
use serde::Deserialize;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{
    GpaSummary, Message, Role, StudentProfileView, TranscriptEntry, UpdateStudentProfile,
};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/student-profiles", get(list))
        .route("/student-profiles/{id}", put(update))
        .route("/student-profiles/{id}/transcript", get(transcript))
        .route("/student-profiles/{id}/gpa", get(gpa))
        .route("/student-profiles/{id}/recompute-gpa", post(recompute_gpa))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    student_id: Option<i64>,
    department: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<StudentProfileView>>, AppError> {
    let mut student_id = q.student_id;

    if user.role == Role::Student {
        if let Some(requested) = student_id {
            if requested != user.user_id {
                return Err(AppError::Forbidden("Access denied to other profiles".to_string()));
            }
        }
        student_id = Some(user.user_id);
    }

    let rows = db::profiles::list_students(&state.db, student_id, q.department.as_deref()).await?;
    if student_id.is_some() && rows.is_empty() {
        return Err(AppError::NotFound("Student not found".to_string()));
    }
    Ok(Json(rows))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(student_id): Path<i64>,
    Json(req): Json<UpdateStudentProfile>,
) -> Result<Json<Message>, AppError> {
    // Students edit only themselves; instructors never edit student
    // profiles; Admin bypasses.
    policy::require_self_or(&user, student_id, &[Role::Admin])?;
    if user.role == Role::Instructor {
        return Err(AppError::Forbidden(
            "Instructors cannot update student profiles".to_string(),
        ));
    }

    db::profiles::update_student(&state.db, student_id, &req).await?;
    Ok(Json(Message::new("Student profile updated")))
}

async fn transcript(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(student_id): Path<i64>,
) -> Result<Json<Vec<TranscriptEntry>>, AppError> {
    policy::require_self_or(&user, student_id, &[Role::Instructor, Role::Admin])?;
    Ok(Json(db::profiles::transcript(&state.db, student_id).await?))
}

async fn gpa(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(student_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    policy::require_self_or(&user, student_id, &[Role::Instructor, Role::Admin])?;
    let current_gpa = db::profiles::current_gpa(&state.db, student_id).await?;
    Ok(Json(serde_json::json!({ "current_gpa": current_gpa })))
}

async fn recompute_gpa(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(student_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;

    match services::gpa::recompute(&state.db, student_id).await? {
        Some(GpaSummary { student_id, gpa, credits_earned }) => Ok(Json(serde_json::json!({
            "student_id": student_id,
            "new_gpa": gpa,
            "credits_earned": credits_earned,
        }))),
        None => Ok(Json(serde_json::json!({
            "message": "No grades found",
            "gpa": 0.0,
        }))),
    }
}
