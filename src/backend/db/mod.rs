//! Persistence Module
//!
//! Store traits consumed by the identity, listing and interaction stores,
//! with two implementations:
//!
//! - **`postgres`** - sqlx over a `PgPool`, schema in `migrations/`
//! - **`memory`** - `HashMap`s behind a `tokio::sync::RwLock`, used when
//!   `DATABASE_URL` is not set and in tests
//!
//! Reads and writes touch a single record, except the two cascading deletes
//! (`delete_user`, `delete_property`) which remove their dependents in one
//! transaction. Concurrent updates are last-write-wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::policy::{AppointmentScope, MessageScope};
use crate::shared::{Appointment, ContactMessage, Property, Role};

/// PostgreSQL store
pub mod postgres;

/// In-memory store
pub mod memory;

pub use memory::MemoryDatabase;
pub use postgres::PgDatabase;

/// Persistence failures
#[derive(Debug, Error)]
pub enum DbError {
    /// A unique constraint rejected the write; carries the field name
    #[error("duplicate value for {0}")]
    Duplicate(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Rows removed alongside a principal
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeCounts {
    pub listings: u64,
    pub appointments: u64,
}

/// Principal records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new principal; `Duplicate("email")` if the email is taken
    async fn insert_user(&self, user: User) -> Result<User, DbError>;

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, DbError>;

    /// Look up by email; callers pass the normalized (lowercase) form
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;

    /// Overwrite a principal record; `Duplicate("email")` if the new email is taken
    async fn update_user(&self, user: User) -> Result<User, DbError>;

    /// Atomically consume a reset token
    ///
    /// Finds the principal whose reset hash equals `token_hash` and whose
    /// expiry is after `now`, stores `new_password_hash` and clears both
    /// reset fields. Returns `None` when no such principal exists.
    async fn consume_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
        new_password_hash: &str,
    ) -> Result<Option<User>, DbError>;

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, DbError>;

    async fn count_users(&self, role: Option<Role>) -> Result<i64, DbError>;

    /// Delete a principal and everything that references it, atomically
    ///
    /// Removes the appointments it booked, every listing it owns and the
    /// appointments on those listings. `None` when no such principal exists.
    async fn delete_user(&self, id: Uuid) -> Result<Option<PurgeCounts>, DbError>;
}

/// Listing records
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn insert_property(&self, property: Property) -> Result<Property, DbError>;

    async fn property_by_id(&self, id: Uuid) -> Result<Option<Property>, DbError>;

    async fn update_property(&self, property: Property) -> Result<Property, DbError>;

    /// Delete a listing and its appointments atomically
    ///
    /// Returns the number of appointments removed, `None` when no such
    /// listing exists.
    async fn delete_property(&self, id: Uuid) -> Result<Option<u64>, DbError>;

    /// Newest first, optionally restricted to one agent
    async fn list_properties(&self, agent: Option<Uuid>) -> Result<Vec<Property>, DbError>;

    async fn count_properties(&self) -> Result<i64, DbError>;
}

/// Appointment records
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, DbError>;

    async fn appointment_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DbError>;

    async fn delete_appointment(&self, id: Uuid) -> Result<bool, DbError>;

    /// Newest first, restricted to `scope`
    async fn list_appointments(&self, scope: AppointmentScope) -> Result<Vec<Appointment>, DbError>;
}

/// Contact message records
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert_message(&self, message: ContactMessage) -> Result<ContactMessage, DbError>;

    async fn message_by_id(&self, id: Uuid) -> Result<Option<ContactMessage>, DbError>;

    async fn delete_message(&self, id: Uuid) -> Result<bool, DbError>;

    /// Newest first, restricted to `scope`
    async fn list_messages(&self, scope: MessageScope) -> Result<Vec<ContactMessage>, DbError>;
}

/// Everything the backend persists
pub trait Database: UserRepository + PropertyRepository + AppointmentRepository + MessageRepository {}

impl<T> Database for T where T: UserRepository + PropertyRepository + AppointmentRepository + MessageRepository {}
