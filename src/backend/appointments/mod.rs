//! Appointments Module
//!
//! Viewing appointments booked by users on listings.

pub mod types;
pub mod service;
pub mod handlers;

pub use types::AppointmentRequest;
