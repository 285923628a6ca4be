/**
 * Authentication Handler Types
 *
 * Request and response bodies for the `/api/auth` endpoints. Request
 * fields are optional at the serde level so a missing field is reported
 * as a field-level validation error rather than a body rejection.
 */

use serde::{Deserialize, Serialize};

use crate::shared::PublicUser;

/// Registration request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Plain text; hashed before storage
    pub password: Option<String>,
    /// `"agent"` is honoured when agent sign-up is enabled; anything else
    /// (including `"admin"`) registers a regular user
    pub role: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ResetPasswordRequest {
    pub password: Option<String>,
}

/// Session token plus the principal it was issued for
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Plain acknowledgement
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
