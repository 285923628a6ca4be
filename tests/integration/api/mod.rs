//! API integration tests
//!
//! Integration tests for all API endpoints

mod admin_test;
mod appointments_test;
mod auth_test;
mod middleware_test;
mod messaging_test;
mod properties_test;
