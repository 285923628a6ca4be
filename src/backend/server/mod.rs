//! Server Module
//!
//! Configuration, application state and startup.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState
//! ├── config.rs       - AppConfig from the environment, store selection
//! └── init.rs         - Collaborator wiring and app creation
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use estatehub::backend::server::{create_app, AppConfig};
//!
//! # async fn example() {
//! let app = create_app(AppConfig::from_env()).await;
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::AppConfig;
pub use init::create_app;
pub use state::AppState;
