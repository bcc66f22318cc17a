mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use sqlx::SqlitePool;
use tower::ServiceExt;

use registrar::auth::AuthConfig;
use registrar::build_router;
use registrar::db;
use registrar::models::{NewAnnouncement, Role};
use registrar::state::AppState;

use common::*;

const TEST_SECRET: &str = "test-secret";

async fn spawn_app() -> (Router, SqlitePool, AuthConfig) {
    let db = setup_db().await;
    let auth = AuthConfig::new(TEST_SECRET, 2);
    let app = build_router(AppState { db: db.clone(), auth: auth.clone() });
    (app, db, auth)
}

fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

#[tokio::test]
async fn missing_invalid_and_expired_tokens_are_unauthorized() {
    let (app, _db, _auth) = spawn_app().await;

    let res = app.clone().oneshot(request("GET", "/users/me", None, None)).await.expect("send");
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .clone()
        .oneshot(request("GET", "/users/me", Some("not-a-jwt"), None))
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Same secret, already-elapsed lifetime.
    let stale = AuthConfig::new(TEST_SECRET, -1)
        .issue_token(1, Role::Student)
        .expect("issue");
    let res = app
        .clone()
        .oneshot(request("GET", "/users/me", Some(&stale), None))
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn students_cannot_touch_other_students_rows() {
    let (app, db, auth) = spawn_app().await;
    let dept = seed_department(&db).await;
    let ada = seed_student(&db, "Ada", "ada@uni.edu", dept).await;
    let grace = seed_student(&db, "Grace", "grace@uni.edu", dept).await;

    let ada_token = auth.issue_token(ada, Role::Student).expect("token");

    let res = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/student-profiles/{grace}/transcript"),
            Some(&ada_token),
            None,
        ))
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/student-profiles/{grace}"),
            Some(&ada_token),
            Some(json!({ "admission_year": 2024 })),
        ))
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/submissions/student/{grace}"),
            Some(&ada_token),
            None,
        ))
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Their own transcript stays reachable.
    let res = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/student-profiles/{ada}/transcript"),
            Some(&ada_token),
            None,
        ))
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn role_gates_hold_regardless_of_token_validity() {
    let (app, db, auth) = spawn_app().await;
    let dept = seed_department(&db).await;
    let ada = seed_student(&db, "Ada", "ada@uni.edu", dept).await;
    let ada_token = auth.issue_token(ada, Role::Student).expect("token");

    // Admin-only listing.
    let res = app
        .clone()
        .oneshot(request("GET", "/users", Some(&ada_token), None))
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Student-only enrollment, attempted by an instructor.
    let prof = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    let prof_token = auth.issue_token(prof, Role::Instructor).expect("token");
    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/enrollments",
            Some(&prof_token),
            Some(json!({ "section_id": 1 })),
        ))
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn instructors_cannot_mutate_sections_they_do_not_teach() {
    let (app, db, auth) = spawn_app().await;
    let dept = seed_department(&db).await;
    let owner = seed_user(&db, "Prof. Aydin", "aydin@uni.edu", Role::Instructor).await;
    let other = seed_user(&db, "Prof. Vega", "vega@uni.edu", Role::Instructor).await;
    seed_course(&db, "CS101", dept, 3.0).await;
    let section = seed_section(&db, "CS101", owner, "B-101", 30).await;
    let announcement = db::announcements::insert(
        &db,
        &NewAnnouncement {
            section_id: section,
            title: "Week 1".to_string(),
            content: "Read chapter one".to_string(),
        },
    )
    .await
    .expect("announcement");

    let other_token = auth.issue_token(other, Role::Instructor).expect("token");

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/assignments",
            Some(&other_token),
            Some(json!({
                "section_id": section,
                "title": "Homework 1",
                "due_date": "2026-09-01T00:00:00Z",
                "max_score": 100,
                "weight": 10.0
            })),
        ))
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/announcements/{announcement}"),
            Some(&other_token),
            Some(json!({ "title": "Hijacked" })),
        ))
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .clone()
        .oneshot(request(
            "POST",
            "/attendance",
            Some(&other_token),
            Some(json!({
                "section_id": section,
                "student_id": 1,
                "date": "2026-03-02",
                "status": "Present"
            })),
        ))
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The owning instructor passes the same gate.
    let owner_token = auth.issue_token(owner, Role::Instructor).expect("token");
    let res = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/announcements/{announcement}"),
            Some(&owner_token),
            Some(json!({ "title": "Week 1 (updated)" })),
        ))
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::OK);
}
