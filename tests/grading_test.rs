mod common;

use chrono::{Duration, Utc};
use registrar::db;
use registrar::error::AppError;
use registrar::models::{NewAssignment, NewAttendance, NewSubmission, Role, UpdateAssignment};
use registrar::services::{enrollment, gpa};

use common::*;

#[tokio::test]
async fn gpa_recompute_is_credit_weighted_and_idempotent() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let instructor = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    let student = seed_student(&db, "Ada", "ada@uni.edu", dept).await;

    seed_course(&db, "CS101", dept, 3.0).await;
    seed_course(&db, "MA101", dept, 4.0).await;
    let cs = seed_section(&db, "CS101", instructor, "B-101", 30).await;
    let ma = seed_section(&db, "MA101", instructor, "B-102", 30).await;
    seed_completed_enrollment(&db, student, cs, 3.0).await;
    seed_completed_enrollment(&db, student, ma, 2.0).await;

    // (3×3 + 2×4) / 7 = 2.43 over 7 credits.
    let summary = gpa::recompute(&db, student).await.expect("recompute").expect("graded rows");
    assert_eq!(summary.gpa, 2.43);
    assert_eq!(summary.credits_earned, 7.0);

    let again = gpa::recompute(&db, student).await.expect("recompute").expect("graded rows");
    assert_eq!(again.gpa, 2.43);
    assert_eq!(again.credits_earned, 7.0);

    let persisted = db::profiles::current_gpa(&db, student).await.expect("profile");
    assert_eq!(persisted, Some(2.43));
}

#[tokio::test]
async fn recompute_without_grades_persists_nothing() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let student = seed_student(&db, "Ada", "ada@uni.edu", dept).await;

    assert!(gpa::recompute(&db, student).await.expect("recompute").is_none());
    // The profile keeps its creation-time value.
    let persisted = db::profiles::current_gpa(&db, student).await.expect("profile");
    assert_eq!(persisted, Some(0.0));
}

#[tokio::test]
async fn weight_budget_allows_exactly_one_hundred() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let instructor = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    seed_course(&db, "CS101", dept, 3.0).await;
    let section = seed_section(&db, "CS101", instructor, "B-101", 30).await;

    let due = Utc::now() + Duration::days(7);
    seed_assignment(&db, section, "Homework 1", 60.0, due, 100).await;
    seed_assignment(&db, section, "Homework 2", 30.0, due, 100).await;

    // 90 committed: topping up to exactly 100 is allowed.
    let quiz = seed_assignment(&db, section, "Quiz", 10.0, due, 20).await;

    // 100.01 total is over budget.
    let err = db::assignments::update(
        &db,
        quiz,
        &UpdateAssignment {
            title: None,
            description: None,
            due_date: None,
            max_score: None,
            weight: Some(10.01),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Total weight exceeds 100%"));

    // The updated assignment is excluded from the "other" sum, so
    // re-stating its own weight stays valid.
    db::assignments::update(
        &db,
        quiz,
        &UpdateAssignment {
            title: None,
            description: None,
            due_date: None,
            max_score: None,
            weight: Some(10.0),
        },
    )
    .await
    .expect("own weight re-stated");

    let err = db::assignments::insert(
        &db,
        &NewAssignment {
            section_id: section,
            title: "Extra credit".to_string(),
            description: None,
            due_date: due,
            max_score: 10,
            weight: 0.01,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn submissions_respect_deadline_enrollment_and_uniqueness() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let instructor = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    seed_course(&db, "CS101", dept, 3.0).await;
    let section = seed_section(&db, "CS101", instructor, "B-101", 30).await;
    let student = seed_student(&db, "Ada", "ada@uni.edu", dept).await;
    enrollment::enroll(&db, student, section).await.expect("enroll");

    let closed = seed_assignment(&db, section, "Late homework", 10.0, Utc::now() - Duration::hours(1), 100).await;
    let open = seed_assignment(&db, section, "Open homework", 10.0, Utc::now() + Duration::days(1), 100).await;

    let req = NewSubmission {
        assignment_id: closed,
        submission_text: Some("too late".to_string()),
        file_path: None,
    };
    let err = db::submissions::create(&db, student, &req, Utc::now()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg == "Deadline passed"));

    // A student outside the section is turned away even before the
    // deadline.
    let outsider = seed_student(&db, "Grace", "grace@uni.edu", dept).await;
    let req = NewSubmission { assignment_id: open, submission_text: None, file_path: None };
    let err = db::submissions::create(&db, outsider, &req, Utc::now()).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(ref msg) if msg == "Not enrolled in this course"));

    db::submissions::create(&db, student, &req, Utc::now()).await.expect("first submission");
    let err = db::submissions::create(&db, student, &req, Utc::now()).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Already submitted"));
}

#[tokio::test]
async fn grading_cannot_exceed_max_score() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let instructor = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    seed_course(&db, "CS101", dept, 3.0).await;
    let section = seed_section(&db, "CS101", instructor, "B-101", 30).await;
    let student = seed_student(&db, "Ada", "ada@uni.edu", dept).await;
    enrollment::enroll(&db, student, section).await.expect("enroll");

    let assignment = seed_assignment(&db, section, "Homework", 10.0, Utc::now() + Duration::days(1), 100).await;
    let req = NewSubmission { assignment_id: assignment, submission_text: None, file_path: None };
    let submission = db::submissions::create(&db, student, &req, Utc::now()).await.expect("submit");

    let err = db::submissions::grade(&db, submission, 100.5, None).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(ref msg) if msg == "Grade exceeds max score 100"));

    db::submissions::grade(&db, submission, 95.0, Some("well done")).await.expect("grade");
}

#[tokio::test]
async fn attendance_is_one_record_per_student_per_day() {
    let db = setup_db().await;
    let dept = seed_department(&db).await;
    let instructor = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    seed_course(&db, "CS101", dept, 3.0).await;
    let section = seed_section(&db, "CS101", instructor, "B-101", 30).await;
    let student = seed_student(&db, "Ada", "ada@uni.edu", dept).await;

    let record = NewAttendance {
        section_id: section,
        student_id: student,
        date: chrono::NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date"),
        status: registrar::models::AttendanceStatus::Present,
    };

    db::attendance::record(&db, &record).await.expect("first record");
    let err = db::attendance::record(&db, &record).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(ref msg) if msg == "Attendance already recorded"));
}
