//! Backend Module
//!
//! This module contains all server-side code for EstateHub. It provides an
//! Axum HTTP server exposing authentication, property listings, appointment
//! booking, messaging and admin endpoints.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`policy`** - Role and ownership authorization rules
//! - **`db`** - Store traits with Postgres and in-memory implementations
//! - **`auth`** - Identity store, JWT sessions, password reset
//! - **`listings`** - Property listings
//! - **`appointments`** - Viewing appointments
//! - **`messaging`** - Contact messages and contact email
//! - **`agents`** - Agent directory and admin-managed agent accounts
//! - **`admin`** - Admin dashboard
//! - **`services`** - Geocoding and email collaborators
//! - **`middleware`** - Authentication and rate limiting
//! - **`error`** - Backend error taxonomy and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization, state, config
//! ├── routes/         - Route configuration
//! ├── policy.rs       - Authorization policy
//! ├── db/             - Persistence
//! ├── auth/           - Authentication
//! ├── listings/       - Properties
//! ├── appointments/   - Appointments
//! ├── messaging/      - Messages
//! ├── agents/         - Agent management
//! ├── admin/          - Dashboard
//! ├── services/       - External collaborators
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! 1. The auth middleware verifies the bearer token and loads the principal
//! 2. The handler loads the target resource (404 if it is missing)
//! 3. The policy decides (401 / 403 on denial)
//! 4. The store performs a single-record read or write
//! 5. The result is serialized as JSON

/// Server initialization and state management
pub mod server;

/// HTTP route configuration
pub mod routes;

/// Authorization policy
pub mod policy;

/// Persistence layer
pub mod db;

/// Authentication and identity
pub mod auth;

/// Property listings
pub mod listings;

/// Viewing appointments
pub mod appointments;

/// Contact messages
pub mod messaging;

/// Agent directory and management
pub mod agents;

/// Admin dashboard
pub mod admin;

/// Geocoding and email collaborators
pub mod services;

/// Request middleware
pub mod middleware;

/// Backend-specific error types
pub mod error;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use error::BackendError;
pub use server::state::AppState;
