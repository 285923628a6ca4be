/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * # Security
 *
 * - Passwords are verified using bcrypt
 * - Unknown email and wrong password return the same 401 message
 * - Password hashes are never returned in responses
 *
 * # Example Request
 *
 * ```http
 * POST /api/auth/login HTTP/1.1
 * Content-Type: application/json
 *
 * { "email": "user@example.com", "password": "securepassword123" }
 * ```
 */

use axum::extract::State;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::service;
use crate::backend::error::BackendError;
use crate::backend::middleware::Json;
use crate::backend::server::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    service::authenticate(&state, request).await.map(Json)
}
