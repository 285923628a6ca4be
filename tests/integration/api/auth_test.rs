//! Authentication API integration tests
//!
//! Registration, login, profile, password change and the reset flow.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{TestApp, PASSWORD};
use crate::{assert_contains, assert_field_error, assert_status};

#[tokio::test]
async fn test_register_never_grants_admin() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Alice", "email": "a@x.com", "password": "secret1", "role": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "user");
    assert!(body["token"].as_str().is_some());
    assert!(body["user"].get("password_hash").is_none());

    let response = app
        .post("/api/auth/login", None, json!({ "email": "a@x.com", "password": "secret1" }))
        .await;
    assert_status!(response, StatusCode::OK);

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "email": "a@x.com", "password": "wrong-one" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let app = TestApp::new();
    app.register("Alice", "alice@example.com", "user").await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Alice Again", "email": "ALICE@example.com", "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn test_register_validation_details() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/auth/register", None, json!({ "name": "A", "email": "nope" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_field_error!(body, "name");
    assert_field_error!(body, "email");
    assert_field_error!(body, "password");
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = TestApp::new();
    let user = app.register("Bob", "bob@example.com", "user").await;

    let (status, body) = app.get("/api/auth/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not authorized, no token");

    let response = app.get("/api/auth/profile", Some("garbage")).await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/api/auth/profile", Some(&user.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "bob@example.com");

    let (status, body) = app
        .put("/api/auth/profile", Some(&user.token), json!({ "bio": "Looking for a flat" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bio"], "Looking for a flat");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let user = app.register("Carol", "carol@example.com", "user").await;

    let response = app
        .put(
            "/api/auth/password",
            Some(&user.token),
            json!({ "currentPassword": "not-it", "newPassword": "newsecret" }),
        )
        .await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let response = app
        .put(
            "/api/auth/password",
            Some(&user.token),
            json!({ "currentPassword": PASSWORD, "newPassword": "newsecret" }),
        )
        .await;
    assert_status!(response, StatusCode::OK);

    let response = app
        .post("/api/auth/login", None, json!({ "email": "carol@example.com", "password": "newsecret" }))
        .await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_password_reset_round_trip_once() {
    let app = TestApp::new();
    app.register("Dave", "dave@example.com", "user").await;

    let (status, body) = app
        .post("/api/auth/forgot-password", None, json!({ "email": "dave@example.com" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password reset email sent");

    let email = app.mailer.last().await.unwrap();
    assert_eq!(email.to, "dave@example.com");
    assert_contains!(email.text, "http://frontend.test/reset-password/");

    let start = email.text.find("/reset-password/").unwrap() + "/reset-password/".len();
    let token: String = email.text[start..].chars().take_while(|c| c.is_ascii_hexdigit()).collect();
    let uri = format!("/api/auth/reset-password/{}", token);

    let (status, body) = app.put(&uri, None, json!({ "password": "brandnew1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());

    let response = app.put(&uri, None, json!({ "password": "again123" })).await;
    assert_status!(response, StatusCode::NOT_FOUND);

    let response = app
        .post("/api/auth/login", None, json!({ "email": "dave@example.com", "password": "brandnew1" }))
        .await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_forgot_password_unknown_email() {
    let app = TestApp::new();
    let response = app
        .post("/api/auth/forgot-password", None, json!({ "email": "ghost@example.com" }))
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
    assert!(app.mailer.sent().await.is_empty());
}
