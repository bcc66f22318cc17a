use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    routing::{delete, get, put},
};
use serde::Deserialize;

use crate::auth::{AuthUser, policy};
use crate::db;
use crate::error::AppError;
use crate::models::{
    Created, CreateUserRequest, Message, PasswordChangeRequest, Role, UpdateUserRequest, UserView,
};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/me", get(me))
        .route("/users/me/change-password", put(change_password))
        .route("/users/{id}", put(update).delete(deactivate))
        .route("/users/hard-delete/{id}", delete(hard_delete))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    search: Option<String>,
    role: Option<Role>,
}

async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<UserView>>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    Ok(Json(db::users::list(&state.db, q.search.as_deref(), q.role).await?))
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserView>, AppError> {
    let view = db::users::get(&state.db, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(view))
}

async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PasswordChangeRequest>,
) -> Result<Json<Message>, AppError> {
    db::users::change_password(&state.db, user.user_id, &req.old_password, &req.new_password)
        .await?;
    Ok(Json(Message::new("Password updated successfully")))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<Created>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    let user_id = db::users::create_with_profile(&state.db, &req).await?;
    Ok(Json(Created::new("User created", user_id)))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    db::users::update(&state.db, user_id, &req).await?;
    Ok(Json(Message::new("User updated")))
}

async fn deactivate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    if db::users::deactivate(&state.db, user_id).await? {
        Ok(Json(Message::new("User deactivated")))
    } else {
        Err(AppError::NotFound("User not found".to_string()))
    }
}

async fn hard_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    policy::require_role(&user, &[Role::Admin])?;
    db::users::hard_delete(&state.db, user_id).await?;
    Ok(Json(Message::new("User permanently deleted")))
}
