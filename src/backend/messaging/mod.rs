//! Messaging Module
//!
//! Contact messages about listings, direct messages from agents and admins
//! to registered principals, and the public contact form.
//!
//! # Module Structure
//!
//! ```text
//! messaging/
//! ├── mod.rs       - Module exports
//! ├── types.rs     - Request and response types
//! ├── service.rs   - Message store operations
//! ├── contact.rs   - Public contact form email
//! └── handlers.rs  - /api/messages and /api/email handlers
//! ```

pub mod types;
pub mod service;
pub mod contact;
pub mod handlers;

pub use types::{ContactEmailRequest, ContactMessageRequest, DirectMessageRequest};
