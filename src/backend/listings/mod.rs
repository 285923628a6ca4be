//! Listings Module
//!
//! Geocoded property listings owned by agents.
//!
//! ```text
//! listings/
//! ├── mod.rs       - Module exports
//! ├── types.rs     - Request and query types
//! ├── service.rs   - Listing store operations
//! └── handlers.rs  - /api/properties handlers
//! ```

pub mod types;
pub mod service;
pub mod handlers;

pub use types::{PropertyInput, PropertyQuery};
