//! Authentication Module
//!
//! Identity store, session tokens and the `/api/auth` handlers.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs       - Module exports and documentation
//! ├── users.rs     - Stored principal record
//! ├── service.rs   - Identity store operations
//! ├── sessions.rs  - JWT signing and verification
//! ├── password.rs  - bcrypt hashing
//! ├── reset.rs     - Password reset tokens
//! └── handlers/    - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: name, email, password → principal created → token returned
//! 2. **Login**: email, password → bcrypt verified → token returned
//! 3. **Authenticated requests**: `Authorization: Bearer <token>` → token
//!    verified → principal loaded from the store
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - Tokens expire after `JWT_EXPIRES_DAYS` (30 by default)
//! - Invalid credentials return 401 without saying which part was wrong
//! - Reset tokens are stored hashed and expire after 10 minutes

/// Stored principal record
pub mod users;

/// Identity store operations
pub mod service;

/// JWT token generation and validation
pub mod sessions;

/// bcrypt hashing
pub mod password;

/// Password reset tokens
pub mod reset;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::types::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
pub use sessions::SessionKeys;
pub use users::User;
