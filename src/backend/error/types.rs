/**
 * Backend Error Types
 *
 * This module defines the error taxonomy returned by stores, the policy and
 * handlers. Every variant maps to exactly one HTTP status; handlers never
 * reclassify an error on its way out.
 *
 * # Error Categories
 *
 * - `SharedError` - Missing or malformed input (400, field-level details)
 * - `Conflict` - Duplicate unique value such as an email (409)
 * - `Unauthenticated` - Missing, invalid or expired credential (401)
 * - `Forbidden` - Authenticated but the policy denies the action (403)
 * - `NotFound` - The target resource does not exist (404)
 * - `Internal` - A collaborator failed: database, email, geocoding (500)
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::db::DbError;
use crate::backend::services::geocoder::GeocodeError;
use crate::backend::services::mailer::MailError;
use crate::shared::{FieldError, SharedError};

/// Backend error taxonomy
///
/// # Usage
///
/// ```rust
/// use estatehub::backend::error::BackendError;
///
/// let err = BackendError::not_found("Property not found");
/// assert_eq!(err.status_code().as_u16(), 404);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Input validation error (from the shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// A unique value is already taken
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable error message
        message: String,
    },

    /// Credential missing, malformed, expired, or not matching
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Human-readable error message
        message: String,
    },

    /// The principal is known but not allowed to do this
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// The resource does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// A downstream collaborator failed
    ///
    /// The message is logged but never sent to the client.
    #[error("Internal error: {message}")]
    Internal {
        /// Diagnostic message, server-side only
        message: String,
    },
}

impl BackendError {
    /// Create a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SharedError(SharedError::validation(field, message))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `SharedError` - 400 Bad Request
    /// - `Conflict` - 409 Conflict
    /// - `Unauthenticated` - 401 Unauthorized
    /// - `Forbidden` - 403 Forbidden
    /// - `NotFound` - 404 Not Found
    /// - `Internal` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::BAD_REQUEST,
            },
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing error message
    ///
    /// Internal errors collapse to one undifferentiated message.
    pub fn message(&self) -> String {
        match self {
            Self::SharedError(err) => err.to_string(),
            Self::Conflict { message }
            | Self::Unauthenticated { message }
            | Self::Forbidden { message }
            | Self::NotFound { message } => message.clone(),
            Self::Internal { .. } => "Internal server error".to_string(),
        }
    }

    /// Field-level details for validation errors
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::SharedError(err) => err.field_errors(),
            _ => &[],
        }
    }
}

impl From<DbError> for BackendError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Duplicate(field) => Self::conflict(format!("{} already in use", field)),
            DbError::Sqlx(e) => Self::internal(format!("database error: {}", e)),
            DbError::Migrate(e) => Self::internal(format!("migration error: {}", e)),
        }
    }
}

impl From<GeocodeError> for BackendError {
    fn from(err: GeocodeError) -> Self {
        Self::internal(format!("geocoding failed: {}", err))
    }
}

impl From<MailError> for BackendError {
    fn from(err: MailError) -> Self {
        Self::internal(format!("email dispatch failed: {}", err))
    }
}

impl From<bcrypt::BcryptError> for BackendError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::internal(format!("password hashing failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for BackendError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("blocking task failed: {}", err))
    }
}
