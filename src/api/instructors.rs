use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{InstructorProfileView, Message, Role, UpdateInstructorProfile};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/instructor-profiles", get(list))
        .route("/instructor-profiles/{id}", put(update))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    instructor_id: Option<i64>,
    department: Option<String>,
    research: Option<String>,
    title: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<InstructorProfileView>>, AppError> {
    let rows = db::profiles::list_instructors(
        &state.db,
        q.instructor_id,
        q.department.as_deref(),
        q.research.as_deref(),
        q.title.as_deref(),
    )
    .await?;

    if q.instructor_id.is_some() && rows.is_empty() {
        return Err(AppError::NotFound("Instructor profile not found".to_string()));
    }
    Ok(Json(rows))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(instructor_id): Path<i64>,
    Json(req): Json<UpdateInstructorProfile>,
) -> Result<Json<Message>, AppError> {
    policy::require_self_or(&user, instructor_id, &[Role::Admin])?;
    if user.role == Role::Student {
        return Err(AppError::Forbidden(
            "Students cannot update instructor profiles".to_string(),
        ));
    }

    db::profiles::update_instructor(&state.db, instructor_id, &req).await?;
    Ok(Json(Message::new("Instructor profile updated")))
}
