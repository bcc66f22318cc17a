pub mod analytics;
pub mod announcements;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod courses;
pub mod departments;
pub mod enrollments;
pub mod instructors;
pub mod office_hours;
pub mod sections;
pub mod students;
pub mod submissions;
pub mod users;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::error::AppError;
use crate::models::Message;
use crate::state::AppState;

/// Routes reachable without a bearer token.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth::router())
}

/// Everything else; the caller layers the token middleware on top.
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .merge(users::router())
        .merge(departments::router())
        .merge(students::router())
        .merge(instructors::router())
        .merge(courses::router())
        .merge(sections::router())
        .merge(enrollments::router())
        .merge(assignments::router())
        .merge(submissions::router())
        .merge(attendance::router())
        .merge(office_hours::router())
        .merge(announcements::router())
        .merge(analytics::router())
}

async fn root() -> Json<Message> {
    Json(Message::new("Welcome to the University Records API"))
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
