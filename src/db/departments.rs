use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{Department, NewDepartment, UpdateDepartment};

pub async fn list(
    db: &SqlitePool,
    faculty_name: Option<&str>,
    department_name: Option<&str>,
) -> Result<Vec<Department>, AppError> {
    let mut sql = String::from(
        "SELECT department_id, name, faculty_name, budget_code, head_of_department FROM departments WHERE 1=1",
    );
    if faculty_name.is_some() {
        sql.push_str(" AND faculty_name = ?");
    }
    if department_name.is_some() {
        sql.push_str(" AND name LIKE ?");
    }

    let mut query = sqlx::query_as::<_, Department>(&sql);
    if let Some(f) = faculty_name {
        query = query.bind(f.to_string());
    }
    if let Some(n) = department_name {
        query = query.bind(format!("%{n}%"));
    }

    Ok(query.fetch_all(db).await?)
}

pub async fn insert(db: &SqlitePool, dept: &NewDepartment) -> Result<i64, AppError> {
    let result = sqlx::query(
        "INSERT INTO departments (name, faculty_name, budget_code, head_of_department) VALUES (?, ?, ?, ?)",
    )
    .bind(&dept.name)
    .bind(&dept.faculty_name)
    .bind(&dept.budget_code)
    .bind(&dept.head_of_department)
    .execute(db)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update(
    db: &SqlitePool,
    department_id: i64,
    req: &UpdateDepartment,
) -> Result<(), AppError> {
    if req.name.is_none() && req.budget_code.is_none() && req.head_of_department.is_none() {
        return Err(AppError::Validation("No fields provided".to_string()));
    }

    let mut current = sqlx::query_as::<_, Department>(
        "SELECT department_id, name, faculty_name, budget_code, head_of_department FROM departments WHERE department_id = ?",
    )
    .bind(department_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Department not found".to_string()))?;

    if let Some(name) = &req.name {
        current.name = name.clone();
    }
    if let Some(budget_code) = &req.budget_code {
        current.budget_code = budget_code.clone();
    }
    if let Some(head) = &req.head_of_department {
        current.head_of_department = Some(head.clone());
    }

    sqlx::query(
        "UPDATE departments SET name = ?, budget_code = ?, head_of_department = ? WHERE department_id = ?",
    )
    .bind(&current.name)
    .bind(&current.budget_code)
    .bind(&current.head_of_department)
    .bind(department_id)
    .execute(db)
    .await?;

    Ok(())
}

/// Deletion is refused while anything still points at the department.
pub async fn delete(db: &SqlitePool, department_id: i64) -> Result<(), AppError> {
    let students: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM student_profiles WHERE department_id = ?")
            .bind(department_id)
            .fetch_one(db)
            .await?;
    if students > 0 {
        return Err(AppError::Conflict("Department has students".to_string()));
    }

    let instructors: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM instructor_profiles WHERE department_id = ?")
            .bind(department_id)
            .fetch_one(db)
            .await?;
    if instructors > 0 {
        return Err(AppError::Conflict("Department has instructors".to_string()));
    }

    let courses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE department_id = ?")
        .bind(department_id)
        .fetch_one(db)
        .await?;
    if courses > 0 {
        return Err(AppError::Conflict("Department has courses".to_string()));
    }

    let result = sqlx::query("DELETE FROM departments WHERE department_id = ?")
        .bind(department_id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Department not found".to_string()));
    }
    Ok(())
}
