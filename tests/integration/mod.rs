//! Integration tests
//!
//! End-to-end HTTP tests against the in-process router.

mod api;
