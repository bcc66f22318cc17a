#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use registrar::auth::hash_password;
use registrar::db;
use registrar::models::{
    CreateUserRequest, NewAssignment, NewCourse, NewDepartment, NewSection, Role,
};

/// One-connection in-memory database with the full schema applied. A
/// single connection keeps every query on the same memory database.
pub async fn setup_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    pool
}

pub async fn seed_department(db: &SqlitePool) -> i64 {
    db::departments::insert(
        db,
        &NewDepartment {
            name: "Computer Science".to_string(),
            faculty_name: "Engineering".to_string(),
            budget_code: "ENG-CS".to_string(),
            head_of_department: None,
        },
    )
    .await
    .expect("failed to seed department")
}

/// Bare account without profile rows (the registration path).
pub async fn seed_user(db: &SqlitePool, full_name: &str, email: &str, role: Role) -> i64 {
    db::users::register(db, full_name, email, &hash_password("password"), role)
        .await
        .expect("failed to seed user")
}

/// Student account with its profile row, as admin creation does it.
pub async fn seed_student(db: &SqlitePool, full_name: &str, email: &str, department_id: i64) -> i64 {
    db::users::create_with_profile(
        db,
        &CreateUserRequest {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: "password".to_string(),
            role: Role::Student,
            department_id: Some(department_id),
        },
    )
    .await
    .expect("failed to seed student")
}

pub async fn seed_course(db: &SqlitePool, course_code: &str, department_id: i64, credits: f64) -> i64 {
    db::courses::insert(
        db,
        &NewCourse {
            course_code: course_code.to_string(),
            title: format!("{course_code} lectures"),
            department_id,
            credits,
            description: None,
        },
    )
    .await
    .expect("failed to seed course")
}

/// Section on a fixed Monday slot; vary `classroom` to avoid schedule
/// collisions between seeded sections.
pub async fn seed_section(
    db: &SqlitePool,
    course_code: &str,
    instructor_id: i64,
    classroom: &str,
    capacity: i64,
) -> i64 {
    db::sections::insert(
        db,
        &NewSection {
            course_code: course_code.to_string(),
            instructor_id,
            semester: "Fall".to_string(),
            year: 2026,
            schedule_day: "Monday".to_string(),
            schedule_time: "10:00".to_string(),
            classroom: classroom.to_string(),
            capacity,
        },
    )
    .await
    .expect("failed to seed section")
}

/// Directly seeds a finished enrollment, bypassing admission checks.
pub async fn seed_completed_enrollment(
    db: &SqlitePool,
    student_id: i64,
    section_id: i64,
    grade: f64,
) {
    sqlx::query(
        "INSERT INTO enrollments (student_id, section_id, grade, completion_status) VALUES (?, ?, ?, 'Completed')",
    )
    .bind(student_id)
    .bind(section_id)
    .bind(grade)
    .execute(db)
    .await
    .expect("failed to seed enrollment");
}

pub async fn seed_assignment(
    db: &SqlitePool,
    section_id: i64,
    title: &str,
    weight: f64,
    due_date: DateTime<Utc>,
    max_score: i64,
) -> i64 {
    db::assignments::insert(
        db,
        &NewAssignment {
            section_id,
            title: title.to_string(),
            description: None,
            due_date,
            max_score,
            weight,
        },
    )
    .await
    .expect("failed to seed assignment")
}

pub async fn enrollment_count(db: &SqlitePool, section_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE section_id = ?")
        .bind(section_id)
        .fetch_one(db)
        .await
        .expect("failed to count enrollments")
}
