//! Appointment API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::assert_status;
use crate::common::TestApp;

#[tokio::test]
async fn test_agent_visibility_and_delete() {
    let app = TestApp::new();
    let agent_a = app.register("Agent A", "a@agency.com", "agent").await;
    let agent_c = app.register("Agent C", "c@agency.com", "agent").await;
    let user = app.register("Uma", "uma@example.com", "user").await;
    let listing = app.create_listing(&agent_a, "1 Main Street").await;

    let (status, body) = app
        .post(
            "/api/appointments",
            Some(&user.token),
            json!({ "propertyId": listing, "date": "2025-07-01", "time": "14:00", "message": "After work" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["property"]["title"], "Bright family house");
    let id = body["id"].as_str().unwrap().to_string();
    let uri = format!("/api/appointments/{}", id);

    let (_, body) = app.get("/api/appointments", Some(&agent_a.token)).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["user"]["email"], "uma@example.com");

    let (_, body) = app.get("/api/appointments", Some(&agent_c.token)).await;
    assert_eq!(body["count"], 0);

    let response = app.get(&uri, Some(&agent_c.token)).await;
    assert_status!(response, StatusCode::FORBIDDEN);
    let response = app.delete(&uri, Some(&agent_c.token)).await;
    assert_status!(response, StatusCode::FORBIDDEN);

    let response = app.delete(&uri, Some(&agent_a.token)).await;
    assert_status!(response, StatusCode::OK);
    let response = app.get(&uri, Some(&user.token)).await;
    assert_status!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_rules() {
    let app = TestApp::new();
    let agent = app.register("Agent A", "a@agency.com", "agent").await;
    let user = app.register("Uma", "uma@example.com", "user").await;
    let listing = app.create_listing(&agent, "1 Main Street").await;
    let booking = json!({ "property": listing, "date": "2025-07-01", "time": "09:15" });

    let response = app.post("/api/appointments", None, booking.clone()).await;
    assert_status!(response, StatusCode::UNAUTHORIZED);

    let response = app.post("/api/appointments", Some(&agent.token), booking.clone()).await;
    assert_status!(response, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(
            "/api/appointments",
            Some(&user.token),
            json!({ "propertyId": listing, "date": "tomorrow", "time": "9am" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"].as_array().unwrap().len(), 2);

    let response = app.post("/api/appointments", Some(&user.token), booking).await;
    assert_status!(response, StatusCode::CREATED);
}

#[tokio::test]
async fn test_deleting_listing_removes_its_appointments() {
    let app = TestApp::new();
    let agent = app.register("Agent A", "a@agency.com", "agent").await;
    let user = app.register("Uma", "uma@example.com", "user").await;
    let listing = app.create_listing(&agent, "1 Main Street").await;

    let response = app
        .post(
            "/api/appointments",
            Some(&user.token),
            json!({ "propertyId": listing, "date": "2025-07-01", "time": "14:00" }),
        )
        .await;
    assert_status!(response, StatusCode::CREATED);

    let response = app.delete(&format!("/api/properties/{}", listing), Some(&agent.token)).await;
    assert_status!(response, StatusCode::OK);

    let (_, body) = app.get("/api/appointments", Some(&user.token)).await;
    assert_eq!(body["count"], 0);
}
