pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

use axum::{Router, middleware};

use crate::state::AppState;

/// The full application router: login/registration and health stay public,
/// everything else sits behind the bearer-token middleware.
pub fn build_router(state: AppState) -> Router {
    let protected = api::protected_router()
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    api::public_router().merge(protected).with_state(state)
}
