//! Password handlers
//!
//! - PUT /api/auth/password - change password (authenticated)
//! - POST /api/auth/forgot-password - email a reset link
//! - PUT /api/auth/reset-password/{token} - set a new password with the link token

use axum::extract::State;

use crate::backend::auth::handlers::types::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, MessageResponse, ResetPasswordRequest,
};
use crate::backend::auth::service;
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, Json, Path};
use crate::backend::server::state::AppState;

pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    service::change_password(&state, &principal, request).await.map(Json)
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    service::initiate_password_reset(&state, request).await.map(Json)
}

pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    service::complete_password_reset(&state, &token, request).await.map(Json)
}
