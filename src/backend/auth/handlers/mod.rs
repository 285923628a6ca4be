//! Authentication Handlers Module
//!
//! HTTP handlers for the `/api/auth` endpoints. They only extract the
//! request and delegate to `auth::service`.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Handler exports
//! ├── types.rs     - Request and response types
//! ├── register.rs  - POST /api/auth/register
//! ├── login.rs     - POST /api/auth/login
//! ├── profile.rs   - GET/PUT /api/auth/profile
//! └── password.rs  - Password change and reset
//! ```

/// Request and response types
pub mod types;

pub mod register;
pub mod login;
pub mod profile;
pub mod password;

pub use login::login;
pub use password::{change_password, forgot_password, reset_password};
pub use profile::{get_profile, update_profile};
pub use register::register;
