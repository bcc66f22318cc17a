use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{Created, Department, Message, NewDepartment, Role, UpdateDepartment};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list).post(create))
        .route("/departments/{id}", put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    faculty_name: Option<String>,
    department_name: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Department>>, AppError> {
    let rows =
        db::departments::list(&state.db, q.faculty_name.as_deref(), q.department_name.as_deref())
            .await?;
    Ok(Json(rows))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<NewDepartment>,
) -> Result<Json<Created>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    let id = db::departments::insert(&state.db, &req).await?;
    Ok(Json(Created::new("Department created", id)))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(department_id): Path<i64>,
    Json(req): Json<UpdateDepartment>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    db::departments::update(&state.db, department_id, &req).await?;
    Ok(Json(Message::new("Department updated")))
}

async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(department_id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    db::departments::delete(&state.db, department_id).await?;
    Ok(Json(Message::new("Department deleted")))
}
