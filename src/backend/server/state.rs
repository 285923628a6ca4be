/**
 * Application State
 *
 * `AppState` is the central state container shared by every handler. It
 * holds the store handle, the configuration and the external collaborators,
 * each behind an `Arc` so cloning the state per request is cheap.
 *
 * # Example
 *
 * ```rust,no_run
 * use estatehub::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let frontend = state.config.frontend_base();
 * }
 * ```
 */

use std::sync::Arc;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::db::Database;
use crate::backend::middleware::rate_limit::RateLimiter;
use crate::backend::server::config::AppConfig;
use crate::backend::services::{Geocoder, Mailer};

#[derive(Clone)]
pub struct AppState {
    /// Principals, listings, appointments and messages
    pub db: Arc<dyn Database>,

    pub config: Arc<AppConfig>,

    /// JWT signing keys
    pub sessions: SessionKeys,

    pub geocoder: Arc<dyn Geocoder>,

    pub mailer: Arc<dyn Mailer>,

    /// Per-IP request budget
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db: Arc<dyn Database>,
        geocoder: Arc<dyn Geocoder>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            sessions: SessionKeys::from_config(&config),
            rate_limiter: RateLimiter::from_config(&config.rate_limit),
            config: Arc::new(config),
            db,
            geocoder,
            mailer,
        }
    }
}
