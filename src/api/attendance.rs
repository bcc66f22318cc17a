use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    routing::{delete, get, put},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{AttendanceRecord, Message, NewAttendance, Role, UpdateAttendance};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(list).post(record))
        .route("/attendance/bulk-clear", delete(bulk_clear))
        .route("/attendance/ratio/{section_id}/{student_id}", get(ratio))
        .route("/attendance/{id}", put(update_status))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    section_id: i64,
    student_id: Option<i64>,
    date_filter: Option<NaiveDate>,
}

async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let student_id = if user.role == Role::Student {
        Some(user.user_id)
    } else {
        q.student_id
    };

    if user.role == Role::Instructor {
        policy::require_teaches_section(&state.db, &user, q.section_id).await?;
    }

    let rows = db::attendance::list(&state.db, q.section_id, student_id, q.date_filter).await?;
    Ok(Json(rows))
}

async fn ratio(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((section_id, student_id)): Path<(i64, i64)>,
) -> Result<Json<serde_json::Value>, AppError> {
    policy::require_self_or(&user, student_id, &[Role::Instructor, Role::Admin])?;

    match db::attendance::ratio(&state.db, section_id, student_id).await? {
        Some(ratio) => Ok(Json(serde_json::json!(ratio))),
        None => Ok(Json(serde_json::json!({ "message": "No attendance records found" }))),
    }
}

async fn record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewAttendance>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Instructor, Role::Admin])?;
    policy::require_teaches_section(&state.db, &user, req.section_id).await?;

    db::attendance::record(&state.db, &req).await?;
    Ok(Json(Message::new("Attendance recorded")))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(attendance_id): Path<i64>,
    Json(req): Json<UpdateAttendance>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Instructor, Role::Admin])?;
    let section_id = db::attendance::section_of(&state.db, attendance_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Attendance record not found".to_string()))?;
    policy::require_teaches_section(&state.db, &user, section_id).await?;

    db::attendance::update_status(&state.db, attendance_id, req.status).await?;
    Ok(Json(Message::new("Attendance updated")))
}

#[derive(Debug, Deserialize)]
struct BulkClearQuery {
    section_id: i64,
    date: NaiveDate,
}

async fn bulk_clear(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<BulkClearQuery>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;

    let deleted = db::attendance::bulk_clear(&state.db, q.section_id, q.date).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("No records found".to_string()));
    }
    Ok(Json(Message::new(format!("Deleted {deleted} records"))))
}
