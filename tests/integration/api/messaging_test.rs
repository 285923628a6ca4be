//! Messaging and contact email integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{TestApp, ADMIN_EMAIL};
use crate::{assert_field_error, assert_status};

#[tokio::test]
async fn test_enquiry_notifies_and_is_scoped() {
    let app = TestApp::new();
    let agent_a = app.register("Agent A", "a@agency.com", "agent").await;
    let agent_b = app.register("Agent B", "b@agency.com", "agent").await;
    let admin = app.admin().await;
    let listing = app.create_listing(&agent_a, "1 Main Street").await;

    let (status, body) = app
        .post(
            "/api/messages",
            None,
            json!({
                "name": "Visitor",
                "email": "visitor@example.com",
                "message": "Is the garden south facing?",
                "property": listing
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["sender_id"].is_null());

    let recipients: Vec<String> = app.mailer.sent().await.into_iter().map(|e| e.to).collect();
    assert_eq!(recipients, vec![ADMIN_EMAIL.to_string(), "a@agency.com".to_string()]);

    let (_, body) = app.get("/api/messages", Some(&agent_a.token)).await;
    assert_eq!(body["count"], 1);
    let (_, body) = app.get("/api/messages", Some(&agent_b.token)).await;
    assert_eq!(body["count"], 0);
    let (_, body) = app.get("/api/messages", Some(&admin.token)).await;
    assert_eq!(body["count"], 1);

    let response = app.get("/api/messages", None).await;
    assert_status!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logged_in_sender_is_recorded() {
    let app = TestApp::new();
    let user = app.register("Uma", "uma@example.com", "user").await;

    let (status, body) = app
        .post(
            "/api/messages",
            Some(&user.token),
            json!({ "name": "Uma", "email": "uma@example.com", "message": "Hello" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sender_id"], user.id.to_string());
}

#[tokio::test]
async fn test_failed_notification_stores_nothing() {
    let app = TestApp::new();
    let agent = app.register("Agent A", "a@agency.com", "agent").await;
    let admin = app.admin().await;
    let listing = app.create_listing(&agent, "1 Main Street").await;

    app.mailer.set_failing(true);
    let (status, body) = app
        .post(
            "/api/messages",
            None,
            json!({ "name": "Visitor", "email": "v@example.com", "message": "Hi", "property": listing }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");

    let (_, body) = app.get("/api/messages", Some(&admin.token)).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_direct_messages_and_admin_delete() {
    let app = TestApp::new();
    let agent = app.register("Agent A", "a@agency.com", "agent").await;
    let user = app.register("Uma", "uma@example.com", "user").await;
    let admin = app.admin().await;

    let (status, body) = app
        .post(
            "/api/messages/send",
            Some(&agent.token),
            json!({ "email": "uma@example.com", "subject": "Viewing", "message": "See you at 2pm" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(app.mailer.last().await.unwrap().to, "uma@example.com");

    let (_, body) = app.get("/api/messages/mine", Some(&user.token)).await;
    assert_eq!(body["count"], 1);

    let response = app
        .post(
            "/api/messages/send",
            Some(&user.token),
            json!({ "email": "a@agency.com", "message": "Thanks" }),
        )
        .await;
    assert_status!(response, StatusCode::FORBIDDEN);

    let response = app
        .post(
            "/api/messages/send",
            Some(&agent.token),
            json!({ "email": "nobody@example.com", "message": "Hello?" }),
        )
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);

    let uri = format!("/api/messages/{}", id);
    let response = app.delete(&uri, Some(&agent.token)).await;
    assert_status!(response, StatusCode::FORBIDDEN);
    let response = app.delete(&uri, Some(&admin.token)).await;
    assert_status!(response, StatusCode::OK);
    let response = app.delete(&uri, Some(&admin.token)).await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_email() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/email/send",
            None,
            json!({ "email": "owner@example.com", "subject": "Valuation", "message": "Please call me", "name": "Sam" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"]["to"], "owner@example.com");
    assert_eq!(body["details"]["accepted"], json!(["owner@example.com"]));
    assert!(body["details"]["messageId"].as_str().is_some());

    let (status, body) = app
        .post("/api/email/send", None, json!({ "email": "bad", "message": "x" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_field_error!(body, "email");
    assert_field_error!(body, "subject");
}
