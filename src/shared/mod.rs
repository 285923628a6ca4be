//! Shared Module
//!
//! This module contains the types exchanged over the HTTP API. They are the
//! serialized form of principals, listings, appointments and messages, plus
//! the validation helpers and error types that requests are checked with.
//!
//! # Overview
//!
//! Nothing in here touches the database or the network. Validation is a
//! pure step that runs before any store call.

/// Shared error types
pub mod error;

/// Field-level input validation
pub mod validation;

/// Principal (user/agent/admin) types
pub mod user;

/// Property listing types
pub mod property;

/// Appointment types
pub mod appointment;

/// Contact message types
pub mod message;

/// Response envelopes
pub mod response;

/// Re-export commonly used types for convenience
pub use error::{FieldError, SharedError};
pub use user::{PublicUser, Role, UserSummary};
pub use property::{AgentSummary, Location, Property, PropertyType, PropertyView};
pub use appointment::{Appointment, AppointmentView, PropertySummary};
pub use message::ContactMessage;
pub use response::ListResponse;
