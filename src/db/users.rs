use chrono::Utc;
use sqlx::{FromRow, SqlitePool};

use crate::auth::hash_password;
use crate::error::{AppError, conflict_on_unique, validation_on_foreign_key};
use crate::models::{CreateUserRequest, Role, UpdateUserRequest, UserView};

/// Credential row used by the login flow.
#[derive(Debug, FromRow)]
pub struct LoginRow {
    pub user_id: i64,
    pub password_hash: String,
    pub role: Role,
}

pub async fn find_login(db: &SqlitePool, email: &str) -> Result<Option<LoginRow>, AppError> {
    let row = sqlx::query_as::<_, LoginRow>(
        "SELECT user_id, password_hash, role FROM users WHERE email = ? AND is_active = 1",
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Registration: inserts the account row only. Profile rows are created by
/// the admin-side [`create_with_profile`].
pub async fn register(
    db: &SqlitePool,
    full_name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO users (full_name, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(full_name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(Utc::now())
    .execute(db)
    .await
    .map_err(|e| conflict_on_unique(e, "Email already exists"))?;

    Ok(result.last_insert_rowid())
}

/// Admin creation: the account row plus the role's profile row in one
/// transaction, so a failed profile insert leaves no dangling account.
pub async fn create_with_profile(db: &SqlitePool, req: &CreateUserRequest) -> Result<i64, AppError> {
    let mut tx = db.begin().await?;

    let result = sqlx::query(
        "INSERT INTO users (full_name, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&req.full_name)
    .bind(&req.email)
    .bind(hash_password(&req.password))
    .bind(req.role)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, "Email already exists"))?;

    let user_id = result.last_insert_rowid();

    match req.role {
        Role::Student => {
            let department_id = req.department_id.ok_or_else(|| {
                AppError::Validation("Student requires department_id".to_string())
            })?;
            sqlx::query(
                "INSERT INTO student_profiles (student_id, department_id, current_gpa) VALUES (?, ?, 0.0)",
            )
            .bind(user_id)
            .bind(department_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| validation_on_foreign_key(e, "Invalid department_id"))?;
        }
        Role::Instructor => {
            let department_id = req.department_id.ok_or_else(|| {
                AppError::Validation("Instructor requires department_id".to_string())
            })?;
            sqlx::query(
                "INSERT INTO instructor_profiles (instructor_id, department_id) VALUES (?, ?)",
            )
            .bind(user_id)
            .bind(department_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| validation_on_foreign_key(e, "Invalid department_id"))?;
        }
        Role::Admin => {}
    }

    tx.commit().await?;
    Ok(user_id)
}

pub async fn list(
    db: &SqlitePool,
    search: Option<&str>,
    role: Option<Role>,
) -> Result<Vec<UserView>, AppError> {
    let mut sql = String::from(
        "SELECT user_id, full_name, email, role, created_at FROM users WHERE is_active = 1",
    );
    if search.is_some() {
        sql.push_str(" AND (full_name LIKE ? OR email LIKE ?)");
    }
    if role.is_some() {
        sql.push_str(" AND role = ?");
    }

    let mut query = sqlx::query_as::<_, UserView>(&sql);
    if let Some(s) = search {
        let pattern = format!("%{s}%");
        query = query.bind(pattern.clone()).bind(pattern);
    }
    if let Some(r) = role {
        query = query.bind(r);
    }

    Ok(query.fetch_all(db).await?)
}

pub async fn get(db: &SqlitePool, user_id: i64) -> Result<Option<UserView>, AppError> {
    let row = sqlx::query_as::<_, UserView>(
        "SELECT user_id, full_name, email, role, created_at FROM users WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

#[derive(Debug, FromRow)]
struct UserRow {
    full_name: String,
    email: String,
    password_hash: String,
    role: Role,
}

pub async fn update(
    db: &SqlitePool,
    user_id: i64,
    req: &UpdateUserRequest,
) -> Result<(), AppError> {
    if req.full_name.is_none()
        && req.email.is_none()
        && req.password.is_none()
        && req.role.is_none()
    {
        return Err(AppError::Validation("No fields provided".to_string()));
    }

    let mut current = sqlx::query_as::<_, UserRow>(
        "SELECT full_name, email, password_hash, role FROM users WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if let Some(full_name) = &req.full_name {
        current.full_name = full_name.clone();
    }
    if let Some(email) = &req.email {
        current.email = email.clone();
    }
    if let Some(password) = &req.password {
        current.password_hash = hash_password(password);
    }
    if let Some(role) = req.role {
        current.role = role;
    }

    sqlx::query(
        "UPDATE users SET full_name = ?, email = ?, password_hash = ?, role = ? WHERE user_id = ?",
    )
    .bind(&current.full_name)
    .bind(&current.email)
    .bind(&current.password_hash)
    .bind(current.role)
    .bind(user_id)
    .execute(db)
    .await
    .map_err(|e| conflict_on_unique(e, "Email already exists"))?;

    Ok(())
}

pub async fn change_password(
    db: &SqlitePool,
    user_id: i64,
    old_password: &str,
    new_password: &str,
) -> Result<(), AppError> {
    let stored: Option<String> =
        sqlx::query_scalar("SELECT password_hash FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(db)
            .await?;

    match stored {
        Some(hash) if hash == hash_password(old_password) => {
            sqlx::query("UPDATE users SET password_hash = ? WHERE user_id = ?")
                .bind(hash_password(new_password))
                .bind(user_id)
                .execute(db)
                .await?;
            Ok(())
        }
        _ => Err(AppError::Unauthorized("Current password incorrect".to_string())),
    }
}

/// Soft delete: flips the active flag, keeps every row.
pub async fn deactivate(db: &SqlitePool, user_id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("UPDATE users SET is_active = 0 WHERE user_id = ?")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Hard delete: irreversible, cascades to the role's profile row.
pub async fn hard_delete(db: &SqlitePool, user_id: i64) -> Result<(), AppError> {
    let mut tx = db.begin().await?;

    let role: Option<Role> = sqlx::query_scalar("SELECT role FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

    let role = role.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    match role {
        Role::Student => {
            sqlx::query("DELETE FROM student_profiles WHERE student_id = ?")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }
        Role::Instructor => {
            sqlx::query("DELETE FROM instructor_profiles WHERE instructor_id = ?")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }
        Role::Admin => {}
    }

    sqlx::query("DELETE FROM users WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
