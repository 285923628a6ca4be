/**
 * Registration Handler
 *
 * POST /api/auth/register
 *
 * Creates a principal and returns a session token for it (201). The role
 * is `user` unless `"agent"` was requested and agent sign-up is enabled.
 */

use axum::{extract::State, http::StatusCode};

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::backend::auth::service;
use crate::backend::error::BackendError;
use crate::backend::middleware::Json;
use crate::backend::server::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    let response = service::register(&state, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
