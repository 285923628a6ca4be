//! Listing API integration tests

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{auth_header, listing_body, TestApp};
use crate::{assert_field_error, assert_status};

#[tokio::test]
async fn test_agent_creates_geocoded_listing() {
    let app = TestApp::new();
    let agent = app.register("Agent A", "a@agency.com", "agent").await;

    let (status, body) = app
        .post("/api/properties", Some(&agent.token), listing_body("22 Baker Street"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "house");
    assert_eq!(body["location"]["type"], "Point");
    assert_eq!(body["location"]["coordinates"], json!([-0.158, 51.523]));
    assert_eq!(body["agent"]["email"], "a@agency.com");

    let id = body["id"].as_str().unwrap();
    let (status, body) = app.get(&format!("/api/properties/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Bright family house");
}

#[tokio::test]
async fn test_geocoding_failure_persists_nothing() {
    let app = TestApp::new();
    let agent = app.register("Agent A", "a@agency.com", "agent").await;

    let (status, body) = app
        .post("/api/properties", Some(&agent.token), listing_body("Nowhere Lane 404"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_field_error!(body, "address");

    let (_, body) = app.get("/api/properties", None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_only_owner_or_admin_may_modify() {
    let app = TestApp::new();
    let owner = app.register("Agent A", "a@agency.com", "agent").await;
    let other = app.register("Agent B", "b@agency.com", "agent").await;
    let user = app.register("Uma", "uma@example.com", "user").await;
    let admin = app.admin().await;
    let id = app.create_listing(&owner, "1 Main Street").await;
    let uri = format!("/api/properties/{}", id);

    let (status, body) = app.put(&uri, Some(&other.token), json!({ "price": 1 })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not authorized to update this property");

    let response = app.put(&uri, Some(&user.token), json!({ "price": 1 })).await;
    assert_status!(response, StatusCode::FORBIDDEN);

    let response = app.put(&uri, None, json!({ "price": 1 })).await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let (status, body) = app.put(&uri, Some(&admin.token), json!({ "price": 300000 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 300000.0);

    let response = app.delete(&uri, Some(&other.token)).await;
    assert_status!(response, StatusCode::FORBIDDEN);
    let response = app.delete(&uri, Some(&owner.token)).await;
    assert_status!(response, StatusCode::OK);
    let response = app.get(&uri, None).await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_users_cannot_create_listings() {
    let app = TestApp::new();
    let user = app.register("Uma", "uma@example.com", "user").await;

    let response = app
        .post("/api/properties", Some(&user.token), listing_body("1 Main Street"))
        .await;
    assert_status!(response, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_filtered_by_agent() {
    let app = TestApp::new();
    let a = app.register("Agent A", "a@agency.com", "agent").await;
    let b = app.register("Agent B", "b@agency.com", "agent").await;
    app.create_listing(&a, "1 Main Street").await;
    app.create_listing(&b, "10 Downing Street").await;

    let (_, body) = app.get("/api/properties", None).await;
    assert_eq!(body["count"], 2);

    let (status, body) = app.get(&format!("/api/properties?agent={}", a.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["agent"]["email"], "a@agency.com");
}

#[tokio::test]
async fn test_unknown_listing_is_not_found() {
    let app = TestApp::new();
    let response = app
        .get("/api/properties/00000000-0000-0000-0000-000000000000", None)
        .await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mistyped_fields_are_validation_errors() {
    let app = TestApp::new();
    let agent = app.register("Agent A", "a@agency.com", "agent").await;

    let mut body = listing_body("1 Main Street");
    body["price"] = json!("cheap");
    let response = app.post("/api/properties", Some(&agent.token), body).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_eq!(response.1["status"], 400);
    assert_field_error!(response.1, "price");

    let mut body = listing_body("1 Main Street");
    body["rooms"] = json!(3_000_000_000u64);
    let response = app.post("/api/properties", Some(&agent.token), body).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_field_error!(response.1, "rooms");

    let (_, body) = app.get("/api/properties", None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_unparsable_body_and_ids_are_validation_errors() {
    let app = TestApp::new();
    let agent = app.register("Agent A", "a@agency.com", "agent").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/properties")
        .header(header::AUTHORIZATION, auth_header(&agent.token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.send(request).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_field_error!(response.1, "body");

    let response = app.get("/api/properties/not-a-uuid", None).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_field_error!(response.1, "id");

    let response = app.get("/api/properties?agent=nobody", None).await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.1["details"].is_array());
}
