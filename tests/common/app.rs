//! In-process application harness
//!
//! Builds the real router around test collaborators and sends requests
//! through it with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use estatehub::backend::auth::User;
use estatehub::backend::db::{MemoryDatabase, UserRepository};
use estatehub::backend::routes::create_router;
use estatehub::backend::server::{AppConfig, AppState};
use estatehub::backend::services::{RecordingMailer, StaticGeocoder};
use estatehub::shared::Role;

pub const PASSWORD: &str = "password123";
pub const ADMIN_EMAIL: &str = "admin@estatehub.test";

const BODY_LIMIT: usize = 1024 * 1024;

/// Test user credentials
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: "integration-secret".to_string(),
        bcrypt_cost: 4,
        admin_email: Some(ADMIN_EMAIL.to_string()),
        frontend_url: Some("http://frontend.test".to_string()),
        ..AppConfig::default()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let geocoder = StaticGeocoder::new()
            .with("1 Main Street", -0.1, 51.5)
            .with("22 Baker Street", -0.158, 51.523)
            .with("10 Downing Street", -0.1276, 51.5034);
        let mailer = Arc::new(RecordingMailer::new());
        let state = AppState::new(config, Arc::new(MemoryDatabase::new()), Arc::new(geocoder), mailer.clone());

        Self {
            router: create_router(state.clone()),
            state,
            mailer,
        }
    }

    /// Send a request, returning the status and the JSON body (`Null` if empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, body)
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, auth_header(token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Register through the API
    pub async fn register(&self, name: &str, email: &str, role: &str) -> TestUser {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                serde_json::json!({ "name": name, "email": email, "password": PASSWORD, "role": role }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        TestUser {
            id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
            email: body["user"]["email"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Insert an admin directly; admins cannot self-register
    pub async fn admin(&self) -> TestUser {
        let hash = bcrypt::hash(PASSWORD, 4).unwrap();
        let user = User::new("Site Admin", "root@example.com", hash, Role::Admin);
        let user = self.state.db.insert_user(user).await.unwrap();
        TestUser {
            id: user.id,
            token: self.state.sessions.sign(user.id).unwrap(),
            email: user.email,
        }
    }

    /// Create a listing through the API, returning its id
    pub async fn create_listing(&self, agent: &TestUser, address: &str) -> String {
        let (status, body) = self
            .post("/api/properties", Some(&agent.token), listing_body(address))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create listing failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }
}

pub fn listing_body(address: &str) -> Value {
    serde_json::json!({
        "title": "Bright family house",
        "description": "Close to schools",
        "price": 350000,
        "address": address,
        "type": "house",
        "size": 140,
        "rooms": 6,
        "bedrooms": 3,
        "bathrooms": 2
    })
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
