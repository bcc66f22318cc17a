use axum::{
    Json, Router,
    extract::{Extension, Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{AtRiskStudent, CourseDifficultyRow, InstructorWorkloadRow, Role};
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analytics/instructor-workload-performance", get(instructor_workload))
        .route("/analytics/most-difficult-courses", get(most_difficult_courses))
        .route("/analytics/top-risk-students", get(top_risk_students))
}

fn default_min_students() -> i64 {
    5
}

#[derive(Debug, Deserialize)]
struct WorkloadQuery {
    #[serde(default = "default_min_students")]
    min_students: i64,
    limit: Option<i64>,
}

async fn instructor_workload(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<WorkloadQuery>,
) -> Result<Json<Vec<InstructorWorkloadRow>>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;

    let limit = q.limit.unwrap_or(50).clamp(1, 200);
    let min_students = q.min_students.max(1);
    Ok(Json(db::reports::instructor_workload(&state.db, min_students, limit).await?))
}

#[derive(Debug, Deserialize)]
struct DifficultyQuery {
    #[serde(default = "default_min_students")]
    min_students: i64,
    limit: Option<i64>,
}

async fn most_difficult_courses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<DifficultyQuery>,
) -> Result<Json<Vec<CourseDifficultyRow>>, AppError> {
    policy::require_role(&user, &[Role::Admin, Role::Instructor])?;

    let limit = q.limit.unwrap_or(20).clamp(1, 100);
    let min_students = q.min_students.max(1);
    Ok(Json(db::reports::course_difficulty(&state.db, min_students, limit).await?))
}

#[derive(Debug, Deserialize)]
struct RiskQuery {
    semester: String,
    limit: Option<i64>,
}

async fn top_risk_students(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<RiskQuery>,
) -> Result<Json<Vec<AtRiskStudent>>, AppError> {
    policy::require_role(&user, &[Role::Admin, Role::Instructor])?;

    let limit = q.limit.unwrap_or(20).clamp(1, 200) as usize;
    Ok(Json(services::risk::top_risk_students(&state.db, &q.semester, limit).await?))
}
