/**
 * Principal Record
 *
 * The stored form of a principal. It carries the password hash and reset
 * fields, so it is never serialized; clients get `PublicUser` instead.
 */

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::policy::Principal;
use crate::shared::{AgentSummary, PublicUser, Role, UserSummary};

/// Principal as stored in the database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    pub name: String,
    /// Normalized (trimmed, lowercase) email
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub bio: Option<String>,
    /// SHA-256 hex of the outstanding reset token
    pub reset_token_hash: Option<String>,
    pub reset_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A fresh record with no reset token
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash,
            role,
            phone: None,
            bio: None,
            reset_token_hash: None,
            reset_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            phone: self.phone.clone(),
            bio: self.bio.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            role: self.role,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn agent_summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}
