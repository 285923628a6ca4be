//! Route Configuration Module
//!
//! All HTTP routes of the server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Router assembly and shared layers
//! └── api_routes.rs   - Route table by access level
//! ```
//!
//! # Routes
//!
//! ## Public
//!
//! - `POST /api/auth/register`, `POST /api/auth/login`
//! - `POST /api/auth/forgot-password`, `PUT /api/auth/reset-password/{token}`
//! - `GET /api/properties`, `GET /api/properties/{id}`
//! - `POST /api/messages`, `POST /api/email/send` (token optional)
//! - `GET /health`
//!
//! ## Authenticated
//!
//! - `GET/PUT /api/auth/profile`, `PUT /api/auth/password`
//! - `POST /api/properties`, `PUT/DELETE /api/properties/{id}`
//! - `/api/agents`, `/api/agents/{id}`
//! - `/api/appointments`, `/api/appointments/{id}`
//! - `GET /api/messages`, `GET /api/messages/mine`, `POST /api/messages/send`,
//!   `DELETE /api/messages/{id}`
//! - `/api/admin/dashboard`, `/api/admin/users`, `/api/admin/agents`,
//!   `/api/admin/properties` and their `/{id}` deletes

/// Router assembly
pub mod router;

/// Route table
pub mod api_routes;

pub use router::create_router;
