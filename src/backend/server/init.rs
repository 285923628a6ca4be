/**
 * Server Initialization
 *
 * Builds the application from an `AppConfig`:
 *
 * 1. Open the store (Postgres, or the in-memory fallback)
 * 2. Build the geocoder and mailer, falling back to local stand-ins when
 *    they are not configured
 * 3. Create the router
 * 4. Start the periodic rate-limiter cleanup task
 *
 * Missing or failing collaborators never prevent startup; they are logged
 * and replaced.
 */

use std::sync::Arc;
use std::time::Duration;

use axum::Router;

use crate::backend::routes::create_router;
use crate::backend::server::config::{load_database, AppConfig};
use crate::backend::server::state::AppState;
use crate::backend::services::{Geocoder, LogMailer, Mailer, MapQuestGeocoder, SmtpMailer, StaticGeocoder};

/// How often idle rate-limiter buckets are dropped
const RATE_LIMIT_PURGE_INTERVAL: Duration = Duration::from_secs(300);

fn build_geocoder(config: &AppConfig) -> Arc<dyn Geocoder> {
    let Some(settings) = &config.geocoder else {
        tracing::warn!("GEOCODER_API_KEY not set. Addresses cannot be geocoded; listing creation will fail.");
        return Arc::new(StaticGeocoder::new());
    };

    match MapQuestGeocoder::new(settings.api_key.clone(), settings.base_url.clone()) {
        Ok(geocoder) => Arc::new(geocoder),
        Err(e) => {
            tracing::error!("Failed to build geocoder client: {}", e);
            Arc::new(StaticGeocoder::new())
        }
    }
}

fn build_mailer(config: &AppConfig) -> Arc<dyn Mailer> {
    let Some(smtp) = &config.smtp else {
        tracing::warn!("SMTP not configured. Emails will be logged instead of sent.");
        return Arc::new(LogMailer);
    };

    match SmtpMailer::new(smtp) {
        Ok(mailer) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "SMTP mailer ready");
            Arc::new(mailer)
        }
        Err(e) => {
            tracing::error!("Failed to build SMTP transport: {}", e);
            Arc::new(LogMailer)
        }
    }
}

/// Create and configure the Axum application
pub async fn create_app(config: AppConfig) -> Router {
    tracing::info!("Initializing EstateHub backend server");

    let db = load_database(&config).await;
    let geocoder = build_geocoder(&config);
    let mailer = build_mailer(&config);

    let state = AppState::new(config, db, geocoder, mailer);
    let app = create_router(state.clone());

    let limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            limiter.purge_stale(limiter.refill_secs()).await;
            tracing::debug!("Purged idle rate-limit buckets");
        }
    });

    tracing::info!("Router configured with periodic rate-limit cleanup");
    app
}
