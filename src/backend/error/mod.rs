//! Backend Error Module
//!
//! This module defines the error taxonomy used across the backend and its
//! conversion into HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # Error Types
//!
//! - `SharedError` - Validation failures with field details
//! - `Conflict` - Duplicate unique values
//! - `Unauthenticated` - Bad or missing credentials
//! - `Forbidden` - Policy denial
//! - `NotFound` - Missing resource
//! - `Internal` - Collaborator failure
//!
//! # Example
//!
//! ```rust,no_run
//! use estatehub::backend::error::BackendError;
//! use axum::response::Response;
//!
//! # async fn example() -> Result<Response, BackendError> {
//! // Handlers return BackendError directly
//! Err(BackendError::forbidden("Not authorized to update this property"))
//! # }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
