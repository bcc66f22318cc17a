use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use tracing::info;

use crate::auth::hash_password;
use crate::db;
use crate::error::AppError;
use crate::models::{LoginRequest, Message, RegisterRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    access_token: String,
    token_type: &'static str,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = db::users::find_login(&state.db, &req.email)
        .await?
        .filter(|u| u.password_hash == hash_password(&req.password))
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let access_token = state.auth.issue_token(user.user_id, user.role)?;
    Ok(Json(TokenResponse { access_token, token_type: "bearer" }))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Message>, AppError> {
    let user_id = db::users::register(
        &state.db,
        &req.full_name,
        &req.email,
        &hash_password(&req.password),
        req.role,
    )
    .await?;

    info!("registered account {} ({:?})", user_id, req.role);
    Ok(Json(Message::new("User registered successfully")))
}
