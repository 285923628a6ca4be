//! Admin and agent management integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::assert_status;
use crate::common::TestApp;

#[tokio::test]
async fn test_dashboard_is_admin_only() {
    let app = TestApp::new();
    let agent = app.register("Agent A", "a@agency.com", "agent").await;
    app.register("Uma", "uma@example.com", "user").await;
    let admin = app.admin().await;
    app.create_listing(&agent, "1 Main Street").await;

    let (status, body) = app.get("/api/admin/dashboard", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "totalUsers": 1, "totalAgents": 1, "totalProperties": 1 }));

    let (status, body) = app.get("/api/admin/dashboard", Some(&agent.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");

    let (_, body) = app.get("/api/admin/users", Some(&admin.token)).await;
    assert_eq!(body["count"], 3);
    let (_, body) = app.get("/api/admin/users?role=agent", Some(&admin.token)).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_admin_deletes_user_with_dependents() {
    let app = TestApp::new();
    let agent = app.register("Agent A", "a@agency.com", "agent").await;
    let admin = app.admin().await;
    app.create_listing(&agent, "1 Main Street").await;

    let response = app.delete(&format!("/api/admin/users/{}", agent.id), Some(&admin.token)).await;
    assert_status!(response, StatusCode::OK);

    let (_, body) = app.get("/api/properties", None).await;
    assert_eq!(body["count"], 0);

    // The token still verifies but the principal is gone
    let response = app.get("/api/auth/profile", Some(&agent.token)).await;
    assert_status!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_agent_management() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let user = app.register("Uma", "uma@example.com", "user").await;

    let new_agent = json!({ "name": "Agent Smith", "email": "smith@agency.com", "password": "secret12" });
    let response = app.post("/api/agents", Some(&user.token), new_agent.clone()).await;
    assert_status!(response, StatusCode::FORBIDDEN);

    let (status, body) = app.post("/api/agents", Some(&admin.token), new_agent).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "agent");
    let id = body["id"].as_str().unwrap().to_string();
    let uri = format!("/api/agents/{}", id);

    let (_, body) = app.get("/api/agents", Some(&user.token)).await;
    assert_eq!(body["count"], 1);

    let (status, body) = app.get(&uri, Some(&user.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agent"]["email"], "smith@agency.com");
    assert_eq!(body["properties"], json!([]));

    let response = app.get("/api/agents", None).await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let (status, body) = app.put(&uri, Some(&admin.token), json!({ "phone": "+14155550123" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone"], "+14155550123");

    let response = app.put(&uri, Some(&admin.token), json!({ "email": "uma@example.com" })).await;
    assert_status!(response, StatusCode::CONFLICT);

    let response = app.delete(&uri, Some(&admin.token)).await;
    assert_status!(response, StatusCode::OK);
    let response = app.get(&uri, Some(&admin.token)).await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_agent_and_listing_views() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let agent = app.register("Agent A", "a@agency.com", "agent").await;
    let user = app.register("Uma", "uma@example.com", "user").await;
    let listing = app.create_listing(&agent, "1 Main Street").await;
    app.create_listing(&admin, "22 Baker Street").await;

    let (status, body) = app.get("/api/admin/agents", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["email"], "a@agency.com");

    let (_, body) = app.get("/api/admin/properties", Some(&admin.token)).await;
    assert_eq!(body["count"], 2);

    let response = app.get("/api/admin/properties", Some(&user.token)).await;
    assert_status!(response, StatusCode::FORBIDDEN);

    let (status, body) = app
        .delete(&format!("/api/admin/properties/{}", listing), Some(&admin.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Property deleted successfully");

    let response = app
        .delete(&format!("/api/admin/agents/{}", user.id), Some(&admin.token))
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);

    let response = app
        .delete(&format!("/api/admin/agents/{}", agent.id), Some(&admin.token))
        .await;
    assert_status!(response, StatusCode::OK);
    let (_, body) = app.get("/api/admin/agents", Some(&admin.token)).await;
    assert_eq!(body["count"], 0);
}
