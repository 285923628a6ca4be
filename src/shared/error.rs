//! Shared Error Types
//!
//! This module defines the error types produced before a request reaches a
//! store: malformed input and serialization failures.
//!
//! # Error Categories
//!
//! - `ValidationError` - One or more request fields failed validation
//! - `SerializationError` - A body, path or query string could not be decoded
//!
//! # Usage
//!
//! ```rust
//! use estatehub::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Please provide a valid email address");
//! assert_eq!(error.field_errors().len(), 1);
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the request field, as it appears in the JSON body
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while checking request input
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// Request input that could not be decoded
    ///
    /// Carries the field serde stopped at, or `body`/`query` when unknown.
    #[error("Serialization error: {}", .error.message)]
    SerializationError {
        error: FieldError,
    },

    /// Data validation error
    ///
    /// Always carries at least one field error.
    #[error("Validation error: {}", summarize(.errors))]
    ValidationError {
        /// Every field that failed, in the order it was checked
        errors: Vec<FieldError>,
    },
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl SharedError {
    /// Create a decode error attributed to `field`
    pub fn serialization(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SerializationError {
            error: FieldError::new(field, message),
        }
    }

    /// Create a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Field-level details (empty for non-validation errors)
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::ValidationError { errors } => errors,
            Self::SerializationError { error } => std::slice::from_ref(error),
        }
    }
}

/// Helper trait for converting serialization errors
impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization("body", format!("JSON error: {}", err))
    }
}
