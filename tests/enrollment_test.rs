mod common;

use registrar::db;
use registrar::error::AppError;
use registrar::models::{Role, UpdateEnrollment};
use registrar::services::enrollment;

use common::*;

#[tokio::test]
async fn full_section_rejects_enrollment_and_inserts_nothing() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let instructor = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    seed_course(&db, "CS101", dept, 3.0).await;
    let section = seed_section(&db, "CS101", instructor, "B-101", 1).await;

    let first = seed_student(&db, "Ada", "ada@uni.edu", dept).await;
    let second = seed_student(&db, "Grace", "grace@uni.edu", dept).await;

    enrollment::enroll(&db, first, section).await.expect("first seat");

    let err = enrollment::enroll(&db, second, section).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Section is full"));
    assert_eq!(enrollment_count(&db, section).await, 1);
}

#[tokio::test]
async fn unmet_prerequisite_blocks_until_completed() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let instructor = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    seed_course(&db, "CS101", dept, 3.0).await;
    seed_course(&db, "CS201", dept, 3.0).await;
    db::courses::add_prerequisite(
        &db,
        &registrar::models::NewPrerequisite {
            course_code: "CS201".to_string(),
            prerequisite_code: "CS101".to_string(),
        },
    )
    .await
    .expect("prerequisite link");

    let intro = seed_section(&db, "CS101", instructor, "B-101", 30).await;
    let advanced = seed_section(&db, "CS201", instructor, "B-102", 30).await;
    let student = seed_student(&db, "Ada", "ada@uni.edu", dept).await;

    let err = enrollment::enroll(&db, student, advanced).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("not completed")));
    assert_eq!(enrollment_count(&db, advanced).await, 0);

    // An active enrollment in the prerequisite is not enough.
    enrollment::enroll(&db, student, intro).await.expect("intro seat");
    let err = enrollment::enroll(&db, student, advanced).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Completing it unlocks the dependent course.
    let enrollment_id: i64 = sqlx::query_scalar(
        "SELECT enrollment_id FROM enrollments WHERE student_id = ? AND section_id = ?",
    )
    .bind(student)
    .bind(intro)
    .fetch_one(&db)
    .await
    .expect("intro enrollment id");
    db::enrollments::update(
        &db,
        enrollment_id,
        &UpdateEnrollment {
            grade: Some(3.0),
            completion_status: Some(registrar::models::CompletionStatus::Completed),
        },
    )
    .await
    .expect("mark completed");

    enrollment::enroll(&db, student, advanced).await.expect("prerequisite satisfied");
    assert_eq!(enrollment_count(&db, advanced).await, 1);
}

#[tokio::test]
async fn duplicate_enrollment_yields_exactly_one_row() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let instructor = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    seed_course(&db, "CS101", dept, 3.0).await;
    let section = seed_section(&db, "CS101", instructor, "B-101", 30).await;
    let student = seed_student(&db, "Ada", "ada@uni.edu", dept).await;

    enrollment::enroll(&db, student, section).await.expect("first call");

    let err = enrollment::enroll(&db, student, section).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Already enrolled in this section"));
    assert_eq!(enrollment_count(&db, section).await, 1);
}

#[tokio::test]
async fn enrolling_in_a_missing_section_is_not_found() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let student = seed_student(&db, "Ada", "ada@uni.edu", dept).await;

    let err = enrollment::enroll(&db, student, 999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
