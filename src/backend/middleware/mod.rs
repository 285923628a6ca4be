//! Middleware Module
//!
//! HTTP middleware applied before requests reach the handlers.
//!
//! - **`auth`** - Bearer token verification and principal extractors
//! - **`extract`** - `Json`, `Path` and `Query` with JSON rejections
//! - **`rate_limit`** - Per-IP token bucket
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//! use estatehub::backend::middleware::auth_middleware;
//!
//! let protected = Router::new()
//!     .route("/api/auth/profile", get(get_profile))
//!     .layer(from_fn_with_state(state.clone(), auth_middleware));
//! ```

pub mod auth;
pub mod extract;
pub mod rate_limit;

pub use auth::{auth_middleware, optional_auth_middleware, AuthUser, MaybeAuthUser};
pub use extract::{Json, Path, Query};
pub use rate_limit::{rate_limit_middleware, RateLimiter};
