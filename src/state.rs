use sqlx::SqlitePool;

use crate::auth::AuthConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub auth: AuthConfig,
}
