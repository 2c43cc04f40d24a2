//! End-to-end tests for identity routes.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;
use spendwise_db::PasswordResetRepository;
use spendwise_shared::types::UserId;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/api/v1/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new();

    let missing = app.request(Method::GET, "/api/v1/expenses", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.json()["error"], "UNAUTHORIZED");

    let garbage = app.get("/api/v1/expenses", "not-a-jwt").await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new();

    let registered = app.register("Alice@Example.com", "password123").await;
    assert_eq!(registered["user"]["email"], "alice@example.com");
    assert_eq!(registered["user"]["display_name"], "Test User");

    let login = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({"email": "alice@example.com", "password": "password123"}),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let token = login.json()["access_token"].as_str().unwrap().to_string();

    let me = app.get("/api/v1/me", &token).await;
    assert_eq!(me.status, StatusCode::OK);
    let body = me.json();
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["settings"]["currency"], "USD");
    assert_eq!(body["settings"]["theme"], "system");
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = TestApp::new();

    let short = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({"email": "a@example.com", "password": "short", "display_name": "A"}),
        )
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(short.json()["error"], "VALIDATION_ERROR");

    let bad_email = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({"email": "nope", "password": "password123", "display_name": "A"}),
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);

    app.register("taken@example.com", "password123").await;
    let duplicate = app
        .post(
            "/api/v1/auth/register",
            None,
            json!({"email": "TAKEN@example.com", "password": "password123", "display_name": "B"}),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.register("bob@example.com", "password123").await;

    let response = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({"email": "bob@example.com", "password": "wrong-password"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_refresh_and_logout() {
    let app = TestApp::new();
    let registered = app.register("carol@example.com", "password123").await;
    let refresh_token = registered["refresh_token"].as_str().unwrap();
    let access_token = registered["access_token"].as_str().unwrap();

    // Refresh tokens are not accepted as bearer tokens.
    let misuse = app.get("/api/v1/me", refresh_token).await;
    assert_eq!(misuse.status, StatusCode::UNAUTHORIZED);

    // Access tokens are not accepted for refresh.
    let wrong_kind = app
        .post("/api/v1/auth/refresh", None, json!({"refresh_token": access_token}))
        .await;
    assert_eq!(wrong_kind.status, StatusCode::UNAUTHORIZED);

    let refreshed = app
        .post("/api/v1/auth/refresh", None, json!({"refresh_token": refresh_token}))
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    assert!(refreshed.json()["access_token"].is_string());

    let logout = app
        .post("/api/v1/auth/logout", None, json!({"refresh_token": refresh_token}))
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    let after = app
        .post("/api/v1/auth/refresh", None, json!({"refresh_token": refresh_token}))
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_password_reset_request_always_accepted() {
    let app = TestApp::new();
    app.register("dave@example.com", "password123").await;

    for email in ["dave@example.com", "nobody@example.com"] {
        let response = app
            .post("/api/v1/auth/password-reset", None, json!({"email": email}))
            .await;
        assert_eq!(response.status, StatusCode::ACCEPTED);
    }
}

#[tokio::test]
async fn test_password_reset_confirm() {
    let app = TestApp::new();
    let registered = app.register("erin@example.com", "password123").await;
    let user_id: UserId = serde_json::from_value(registered["user"]["id"].clone()).unwrap();
    let refresh_token = registered["refresh_token"].as_str().unwrap();

    let token = PasswordResetRepository::new(app.store.clone()).create_token(user_id);

    let confirm = app
        .post(
            "/api/v1/auth/password-reset/confirm",
            None,
            json!({"token": token, "new_password": "new-password-456"}),
        )
        .await;
    assert_eq!(confirm.status, StatusCode::OK);

    // Token is single use.
    let again = app
        .post(
            "/api/v1/auth/password-reset/confirm",
            None,
            json!({"token": token, "new_password": "another-password"}),
        )
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);

    // Existing sessions were revoked.
    let refresh = app
        .post("/api/v1/auth/refresh", None, json!({"refresh_token": refresh_token}))
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);

    let login = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({"email": "erin@example.com", "password": "new-password-456"}),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_profile_settings_and_password_change() {
    let app = TestApp::new();
    let token = app.access_token("frank@example.com").await;

    let profile = app
        .put("/api/v1/me/profile", &token, json!({"display_name": "  Frank  "}))
        .await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.json()["display_name"], "Frank");

    let settings = app
        .put("/api/v1/me/settings", &token, json!({"currency": "EUR", "theme": "dark"}))
        .await;
    assert_eq!(settings.status, StatusCode::OK);
    let body = settings.json();
    assert_eq!(body["currency"], "EUR");
    assert_eq!(body["theme"], "dark");
    assert_eq!(body["budget_alerts"], true);

    let wrong = app
        .put(
            "/api/v1/me/password",
            &token,
            json!({"current_password": "nope-nope", "new_password": "brand-new-pass"}),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let changed = app
        .put(
            "/api/v1/me/password",
            &token,
            json!({"current_password": "password123", "new_password": "brand-new-pass"}),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);
}

#[tokio::test]
async fn test_password_change_revokes_refresh_sessions() {
    let app = TestApp::new();
    let registered = app.register("grace@example.com", "password123").await;
    let access_token = registered["access_token"].as_str().unwrap();
    let refresh_token = registered["refresh_token"].as_str().unwrap();

    let changed = app
        .put(
            "/api/v1/me/password",
            access_token,
            json!({"current_password": "password123", "new_password": "brand-new-pass"}),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);

    let refresh = app
        .post("/api/v1/auth/refresh", None, json!({"refresh_token": refresh_token}))
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);

    let login = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({"email": "grace@example.com", "password": "brand-new-pass"}),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}
