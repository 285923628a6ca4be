//! Profile handlers
//!
//! GET and PUT /api/auth/profile for the authenticated principal.

use axum::extract::State;

use crate::backend::auth::handlers::types::ProfileUpdateRequest;
use crate::backend::auth::service;
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, Json};
use crate::backend::server::state::AppState;
use crate::shared::PublicUser;

pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<PublicUser>, BackendError> {
    service::profile(&state, &principal).await.map(Json)
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(request): Json<ProfileUpdateRequest>,
) -> Result<Json<PublicUser>, BackendError> {
    service::update_profile(&state, &principal, request).await.map(Json)
}
