//! Health, CORS and rate limiting integration tests

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use pretty_assertions::assert_eq;

use estatehub::backend::server::config::RateLimitConfig;

use crate::common::{test_config, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_rate_limit_per_client_ip() {
    let mut config = test_config();
    config.rate_limit = RateLimitConfig {
        max_requests: 2,
        window_ms: 60_000,
    };
    let app = TestApp::with_config(config);

    let from = |ip: &str| {
        Request::builder()
            .uri("/health")
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap()
    };

    assert_eq!(app.send(from("10.0.0.1")).await.0, StatusCode::OK);
    assert_eq!(app.send(from("10.0.0.1")).await.0, StatusCode::OK);

    let (status, body) = app.send(from("10.0.0.1")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["status"], 429);

    assert_eq!(app.send(from("10.0.0.2")).await.0, StatusCode::OK);
}

#[tokio::test]
async fn test_cors_allows_frontend_origin() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/properties")
        .header(header::ORIGIN, "http://frontend.test")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://frontend.test");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}
