/**
 * Router Configuration
 *
 * Combines the route groups into one Axum router and wraps it in the
 * shared layers, outermost first:
 *
 * 1. `TraceLayer` - request spans
 * 2. CORS - `FRONTEND_URL` with credentials when set, permissive otherwise
 * 3. Rate limiting - per client IP
 */

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::from_fn_with_state,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::backend::middleware::rate_limit_middleware;
use crate::backend::routes::api_routes::{optional_auth_routes, protected_routes, public_routes};
use crate::backend::server::config::AppConfig;
use crate::backend::server::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let Some(origin) = config.frontend_url.as_deref() else {
        return CorsLayer::permissive();
    };

    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
        Err(_) => {
            tracing::warn!(origin, "FRONTEND_URL is not a valid origin, CORS left permissive");
            CorsLayer::permissive()
        }
    }
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(public_routes())
        .merge(optional_auth_routes(state.clone()))
        .merge(protected_routes(state.clone()))
        .layer(from_fn_with_state(state.rate_limiter.clone(), rate_limit_middleware))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
