//! Common test utilities and helpers
//!
//! - `TestApp`: the router over an in-memory store, a static geocoder and a
//!   recording mailer, with request helpers
//! - Assertion macros for JSON error bodies

pub mod app;
pub mod assertions;

pub use app::*;
