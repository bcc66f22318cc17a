//! The three ownership policies gating every route. Each endpoint applies
//! exactly one of: role-only, role+self, role+teaches-section.

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::Role;

use super::AuthUser;

/// Role-only: the identity's role must be in `allowed`.
pub fn require_role(user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Forbidden".to_string()))
    }
}

/// Role+self: the identity must own the row (`owner_id`) or hold one of
/// the bypass roles.
pub fn require_self_or(user: &AuthUser, owner_id: i64, bypass: &[Role]) -> Result<(), AppError> {
    if user.user_id == owner_id || bypass.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Access denied".to_string()))
    }
}

/// Role+teaches-section: Admin passes unconditionally, an Instructor must
/// be the section's assigned instructor, a Student is always denied.
pub async fn require_teaches_section(
    db: &SqlitePool,
    user: &AuthUser,
    section_id: i64,
) -> Result<(), AppError> {
    match user.role {
        Role::Admin => Ok(()),
        Role::Instructor => {
            let teaches: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM course_sections WHERE section_id = ? AND instructor_id = ?)",
            )
            .bind(section_id)
            .bind(user.user_id)
            .fetch_one(db)
            .await?;

            if teaches == 1 {
                Ok(())
            } else {
                Err(AppError::Forbidden("You do not teach this section".to_string()))
            }
        }
        Role::Student => Err(AppError::Forbidden("Forbidden".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64) -> AuthUser {
        AuthUser { user_id: id, role: Role::Student }
    }

    #[test]
    fn role_check_allows_listed_roles_only() {
        let admin = AuthUser { user_id: 1, role: Role::Admin };
        assert!(require_role(&admin, &[Role::Admin]).is_ok());
        assert!(require_role(&student(2), &[Role::Instructor, Role::Admin]).is_err());
    }

    #[test]
    fn self_check_allows_owner_and_bypass_roles() {
        assert!(require_self_or(&student(5), 5, &[Role::Admin]).is_ok());
        assert!(require_self_or(&student(5), 6, &[Role::Admin]).is_err());

        let instructor = AuthUser { user_id: 9, role: Role::Instructor };
        // Instructors are not in the bypass set here, so another user's row
        // stays off limits.
        assert!(require_self_or(&instructor, 5, &[Role::Admin]).is_err());
        assert!(require_self_or(&instructor, 5, &[Role::Instructor, Role::Admin]).is_ok());
    }
}
