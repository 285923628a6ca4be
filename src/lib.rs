//! EstateHub - Main Library
//!
//! EstateHub is the backend for a real-estate listing platform: agents publish
//! properties, users book viewing appointments and contact agents, and admins
//! manage the whole catalogue.
//!
//! # Overview
//!
//! This library provides:
//! - Registration, login and password-reset flows with JWT sessions
//! - Property listings with geocoded locations
//! - Appointment booking and contact messaging
//! - Admin dashboards and agent management
//! - A single role/ownership authorization policy applied to every resource
//!
//! # Module Structure
//!
//! - **`shared`** - Types exchanged over the API
//!   - Principals, listings, appointments, messages
//!   - Field-level validation and shared error types
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server, routes and middleware
//!   - Authorization policy
//!   - Stores (Postgres via sqlx, or in-memory)
//!   - Geocoding and email collaborators
//!
//! # Usage
//!
//! ```rust,no_run
//! use estatehub::backend::server::config::AppConfig;
//! use estatehub::backend::server::init::create_app;
//!
//! # async fn example() {
//! let config = AppConfig::from_env();
//! let app = create_app(config).await;
//! // Use app with axum::serve
//! # }
//! ```
//!
//! # Error Handling
//!
//! - Stores and the policy return `Result<T, BackendError>`
//! - `BackendError` converts into a JSON HTTP response
//! - Validation failures carry field-level details

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
