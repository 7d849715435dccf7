//! Integration tests for login and bearer-token verification.
//!
//! Exercises the full credential lifecycle: registering, logging in,
//! identifying the caller from a token, and the ways each step refuses.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use registrar::config::Config;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("registrar-auth-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.auth.secret = TEST_SECRET.to_string();

    let state = registrar::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    registrar::api::router(state)
}

async fn register(
    app: &Router,
    username: &str,
    password: &str,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": username, "password": password }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": username, "password": password }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get_me(app: &Router, bearer: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri("/auth/me");
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_login_returns_a_signed_token() {
    let app = spawn_app().await;

    let (status, _) = register(&app, "login_alice", "correct horse battery staple").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = login(&app, "login_alice", "correct horse battery staple").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["success"].as_bool().unwrap());

    let token = body["data"]["token"].as_str().unwrap();
    assert!(!token.is_empty());
    assert_eq!(token.split('.').count(), 3);
}

#[tokio::test]
async fn test_login_failures_share_one_response() {
    let app = spawn_app().await;

    register(&app, "known_bob", "right-password").await;

    // A wrong password and an unknown username must be indistinguishable,
    // down to the exact bytes of the response body.
    let wrong_password = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": "known_bob", "password": "wrong-password" })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let unknown_user = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "username": "no_such_user", "password": "whatever" })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    let wrong_body = wrong_password
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes();
    let unknown_body = unknown_user.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(wrong_body, unknown_body);

    let body_json: serde_json::Value = serde_json::from_slice(&wrong_body).unwrap();
    assert!(!body_json["success"].as_bool().unwrap());
    assert_eq!(body_json["error"], "Invalid username or password");
}

#[tokio::test]
async fn test_login_with_missing_fields_is_unauthorized() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, body) = login(&app, "half_login", "").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");
}

#[tokio::test]
async fn test_bearer_token_identifies_the_caller() {
    let app = spawn_app().await;

    let (_, body) = register(&app, "me_carol", "carol-password").await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = login(&app, "me_carol", "carol-password").await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = get_me(&app, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "me_carol");
    assert_eq!(body["data"]["user_id"].as_i64().unwrap(), id);
}

#[tokio::test]
async fn test_me_rejects_missing_and_forged_tokens() {
    let app = spawn_app().await;

    let (status, body) = get_me(&app, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing bearer token");

    let (status, body) = get_me(&app, Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");

    // A structurally valid token signed with the wrong secret must fail the
    // same way.
    let now = chrono::Utc::now().timestamp();
    let claims = registrar::services::Claims {
        sub: "me_carol".to_string(),
        uid: 1,
        iss: "registrar".to_string(),
        aud: "registrar-clients".to_string(),
        iat: now,
        exp: now + 3600,
    };
    let forged = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS512),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"a-completely-different-signing-secret"),
    )
    .unwrap();

    let (status, body) = get_me(&app, Some(&forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_password_change_invalidates_old_logins() {
    let app = spawn_app().await;

    let (_, body) = register(&app, "rotate_dave", "old-password").await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = login(&app, "rotate_dave", "old-password").await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/users")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "id": id,
                        "username": "rotate_dave",
                        "password": "new-password"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = login(&app, "rotate_dave", "old-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = login(&app, "rotate_dave", "new-password").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_deleted_user_cannot_login() {
    let app = spawn_app().await;

    let (_, body) = register(&app, "gone_erin", "erin-password").await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = login(&app, "gone_erin", "erin-password").await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/users/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = login(&app, "gone_erin", "erin-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");
}

#[tokio::test]
async fn test_full_account_lifecycle() {
    let app = spawn_app().await;

    let (status, body) = register(&app, "cycle_frank", "first-password").await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = login(&app, "cycle_frank", "first-password").await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = get_me(&app, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "cycle_frank");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/users")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "id": id,
                        "username": "cycle_frank_v2",
                        "password": "second-password"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = login(&app, "cycle_frank_v2", "second-password").await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/users/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/users/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let (status, _) = login(&app, "cycle_frank_v2", "second-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
