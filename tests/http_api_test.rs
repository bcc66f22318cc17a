mod common;

use reqwest::StatusCode;
use serde_json::json;

use registrar::auth::AuthConfig;
use registrar::build_router;
use registrar::state::AppState;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Same router as prod on an ephemeral port, backed by an in-memory
    /// database.
    async fn spawn() -> Self {
        let db = common::setup_db().await;
        let app = build_router(AppState {
            db,
            auth: AuthConfig::new("test-secret", 2),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn protected_endpoints_require_a_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/users/me", srv.base_url))
        .send()
        .await
        .expect("send");
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // The welcome and health routes stay public.
    let res = client.get(format!("{}/", srv.base_url)).send().await.expect("send");
    assert_eq!(res.status(), StatusCode::OK);
    let res = client.get(format!("{}/health", srv.base_url)).send().await.expect("send");
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_login_and_read_own_account() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({
            "full_name": "Ada Lovelace",
            "email": "ada@uni.edu",
            "password": "engine",
            "role": "Student"
        }))
        .send()
        .await
        .expect("register");
    assert_eq!(res.status(), StatusCode::OK);

    // Duplicate email is refused by the store constraint.
    let res = client
        .post(format!("{}/auth/register", srv.base_url))
        .json(&json!({
            "full_name": "Ada Again",
            "email": "ada@uni.edu",
            "password": "engine",
            "role": "Student"
        }))
        .send()
        .await
        .expect("register");
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "ada@uni.edu", "password": "wrong" }))
        .send()
        .await
        .expect("login");
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "ada@uni.edu", "password": "engine" }))
        .send()
        .await
        .expect("login");
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.expect("body");
    let token = body["access_token"].as_str().expect("token").to_string();
    assert_eq!(body["token_type"], "bearer");

    let res = client
        .get(format!("{}/users/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("me");
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.expect("body");
    assert_eq!(body["email"], "ada@uni.edu");
    assert_eq!(body["role"], "Student");
}
