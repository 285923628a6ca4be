//! Fixtures for unit tests: an `AppState` over the in-memory store, a
//! static geocoder and a recording mailer.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::db::{MemoryDatabase, PropertyRepository, UserRepository};
use crate::backend::policy::Principal;
use crate::backend::server::config::AppConfig;
use crate::backend::server::state::AppState;
use crate::backend::services::{RecordingMailer, StaticGeocoder};
use crate::shared::{Location, Property, PropertyType, Role};

pub const ADMIN_EMAIL: &str = "admin@estatehub.test";

pub struct TestContext {
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
}

impl TestContext {
    pub const PASSWORD: &'static str = "password123";

    pub fn new() -> Self {
        let config = AppConfig {
            jwt_secret: "test-secret".to_string(),
            bcrypt_cost: 4,
            admin_email: Some(ADMIN_EMAIL.to_string()),
            frontend_url: Some("http://frontend.test".to_string()),
            ..AppConfig::default()
        };
        let geocoder = StaticGeocoder::new()
            .with("1 Main Street", -0.1, 51.5)
            .with("22 Baker Street", -0.158, 51.523)
            .with("10 Downing Street", -0.1276, 51.5034);
        let mailer = Arc::new(RecordingMailer::new());

        let state = AppState::new(config, Arc::new(MemoryDatabase::new()), Arc::new(geocoder), mailer.clone());
        Self { state, mailer }
    }

    pub async fn seed_user(&self, email: &str, role: Role) -> Principal {
        let hash = bcrypt::hash(Self::PASSWORD, 4).unwrap();
        let user = User::new(format!("{} person", role), email, hash, role);
        self.state.db.insert_user(user).await.unwrap().principal()
    }

    pub async fn seed_property(&self, agent: &Principal) -> Property {
        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            agent_id: agent.id,
            title: "Sunny flat".to_string(),
            description: Some("Two rooms near the park".to_string()),
            price: 250_000.0,
            address: "1 Main Street".to_string(),
            location: Location::point(-0.1, 51.5, "1 Main Street"),
            property_type: PropertyType::Apartment,
            size: 60.0,
            rooms: 3,
            bedrooms: 2,
            bathrooms: 1,
            images: vec![],
            created_at: now,
            updated_at: now,
        };
        self.state.db.insert_property(property).await.unwrap()
    }

    /// Pull the raw token out of a reset email body
    pub fn reset_token_from(text: &str) -> Option<String> {
        let start = text.find("/reset-password/")? + "/reset-password/".len();
        let token: String = text[start..].chars().take_while(|c| c.is_ascii_hexdigit()).collect();
        (!token.is_empty()).then_some(token)
    }
}
