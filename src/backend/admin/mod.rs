//! Admin Module
//!
//! Dashboard counts and principal administration.

pub mod service;
pub mod handlers;

pub use service::DashboardSummary;
