mod common;

use registrar::db;
use registrar::error::AppError;
use registrar::models::{NewSection, Role, UpdateSection};
use registrar::services::enrollment;

use common::*;

fn monday_slot(course_code: &str, instructor_id: i64, classroom: &str) -> NewSection {
    NewSection {
        course_code: course_code.to_string(),
        instructor_id,
        semester: "Fall".to_string(),
        year: 2026,
        schedule_day: "Monday".to_string(),
        schedule_time: "10:00".to_string(),
        classroom: classroom.to_string(),
        capacity: 30,
    }
}

#[tokio::test]
async fn identical_schedule_tuples_cannot_coexist() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let instructor = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    seed_course(&db, "CS101", dept, 3.0).await;
    seed_course(&db, "CS102", dept, 3.0).await;

    db::sections::insert(&db, &monday_slot("CS101", instructor, "B-101"))
        .await
        .expect("first section");

    let err = db::sections::insert(&db, &monday_slot("CS102", instructor, "B-101"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Classroom conflict"));

    // A different room at the same time is fine.
    db::sections::insert(&db, &monday_slot("CS102", instructor, "B-102"))
        .await
        .expect("different classroom");
}

#[tokio::test]
async fn updating_into_an_occupied_slot_conflicts_but_own_slot_does_not() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let instructor = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    seed_course(&db, "CS101", dept, 3.0).await;
    seed_course(&db, "CS102", dept, 3.0).await;

    db::sections::insert(&db, &monday_slot("CS101", instructor, "B-101"))
        .await
        .expect("first section");
    let second = db::sections::insert(&db, &monday_slot("CS102", instructor, "B-102"))
        .await
        .expect("second section");

    let err = db::sections::update(
        &db,
        second,
        &UpdateSection { classroom: Some("B-101".to_string()), capacity: None, instructor_id: None },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Classroom conflict"));

    // Touching only the capacity keeps the tuple unchanged; the section
    // must not collide with itself.
    db::sections::update(
        &db,
        second,
        &UpdateSection { classroom: None, capacity: Some(45), instructor_id: None },
    )
    .await
    .expect("self slot never conflicts");

    // Same for re-stating the current classroom explicitly.
    db::sections::update(
        &db,
        second,
        &UpdateSection { classroom: Some("B-102".to_string()), capacity: None, instructor_id: None },
    )
    .await
    .expect("unchanged classroom never conflicts");
}

#[tokio::test]
async fn sections_with_enrollments_cannot_be_deleted() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let instructor = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    seed_course(&db, "CS101", dept, 3.0).await;
    let section = seed_section(&db, "CS101", instructor, "B-101", 30).await;
    let student = seed_student(&db, "Ada", "ada@uni.edu", dept).await;

    enrollment::enroll(&db, student, section).await.expect("enroll");

    let err = db::sections::delete(&db, section).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Students already enrolled"));

    // Dropping the enrollment frees the section for deletion.
    sqlx::query("DELETE FROM enrollments WHERE section_id = ?")
        .bind(section)
        .execute(&db)
        .await
        .expect("clear enrollments");
    db::sections::delete(&db, section).await.expect("delete empty section");
}
