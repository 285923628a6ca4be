/**
 * API Route Table
 *
 * Routes are grouped by how the caller is identified:
 *
 * - **public** - no credential needed
 * - **optional** - a bearer token is used when present, so the sender of a
 *   contact message can be recorded
 * - **protected** - a valid bearer token is required
 *
 * Role and ownership checks happen in the stores, not here.
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::middleware::{auth_middleware, optional_auth_middleware};
use crate::backend::server::state::AppState;
use crate::backend::{admin, agents, appointments, auth, listings, messaging};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(auth::handlers::register))
        .route("/api/auth/login", post(auth::handlers::login))
        .route("/api/auth/forgot-password", post(auth::handlers::forgot_password))
        .route("/api/auth/reset-password/{token}", put(auth::handlers::reset_password))
        .route("/api/properties", get(listings::handlers::list_properties))
        .route("/api/properties/{id}", get(listings::handlers::get_property))
}

pub fn optional_auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/messages", post(messaging::handlers::create_message))
        .route("/api/email/send", post(messaging::handlers::send_contact_email))
        .route_layer(from_fn_with_state(state, optional_auth_middleware))
}

pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Account
        .route(
            "/api/auth/profile",
            get(auth::handlers::get_profile).put(auth::handlers::update_profile),
        )
        .route("/api/auth/password", put(auth::handlers::change_password))
        // Listings
        .route("/api/properties", post(listings::handlers::create_property))
        .route(
            "/api/properties/{id}",
            put(listings::handlers::update_property).delete(listings::handlers::delete_property),
        )
        // Agents
        .route(
            "/api/agents",
            get(agents::handlers::list_agents).post(agents::handlers::create_agent),
        )
        .route(
            "/api/agents/{id}",
            get(agents::handlers::get_agent)
                .put(agents::handlers::update_agent)
                .delete(agents::handlers::delete_agent),
        )
        // Appointments
        .route(
            "/api/appointments",
            get(appointments::handlers::list_appointments).post(appointments::handlers::create_appointment),
        )
        .route(
            "/api/appointments/{id}",
            get(appointments::handlers::get_appointment).delete(appointments::handlers::delete_appointment),
        )
        // Messages
        .route("/api/messages", get(messaging::handlers::list_messages))
        .route("/api/messages/mine", get(messaging::handlers::list_my_messages))
        .route("/api/messages/send", post(messaging::handlers::send_direct_message))
        .route("/api/messages/{id}", delete(messaging::handlers::delete_message))
        // Admin
        .route("/api/admin/dashboard", get(admin::handlers::dashboard_summary))
        .route("/api/admin/users", get(admin::handlers::list_users))
        .route("/api/admin/users/{id}", delete(admin::handlers::delete_user))
        .route("/api/admin/agents", get(admin::handlers::list_agents))
        .route("/api/admin/agents/{id}", delete(admin::handlers::delete_agent))
        .route("/api/admin/properties", get(admin::handlers::list_properties))
        .route("/api/admin/properties/{id}", delete(admin::handlers::delete_property))
        .route_layer(from_fn_with_state(state, auth_middleware))
}
