//! In-memory store
//!
//! Same contract as the Postgres store, minus durability. Email uniqueness
//! is checked case-insensitively, like the `LOWER(email)` index.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    AppointmentRepository, DbError, MessageRepository, PropertyRepository, PurgeCounts, UserRepository,
};
use crate::backend::auth::users::User;
use crate::backend::policy::{AppointmentScope, MessageScope};
use crate::shared::{Appointment, ContactMessage, Property, Role};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    properties: HashMap<Uuid, Property>,
    appointments: HashMap<Uuid, Appointment>,
    messages: HashMap<Uuid, ContactMessage>,
}

/// Store backed by `HashMap`s
#[derive(Default)]
pub struct MemoryDatabase {
    tables: RwLock<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(tables: &Tables, email: &str, except: Option<Uuid>) -> bool {
    tables
        .users
        .values()
        .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
}

fn newest_first<T, F>(mut items: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn insert_user(&self, user: User) -> Result<User, DbError> {
        let mut tables = self.tables.write().await;
        if email_taken(&tables, &user.email, None) {
            return Err(DbError::Duplicate("email".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, DbError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_user(&self, user: User) -> Result<User, DbError> {
        let mut tables = self.tables.write().await;
        if email_taken(&tables, &user.email, Some(user.id)) {
            return Err(DbError::Duplicate("email".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn consume_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
        new_password_hash: &str,
    ) -> Result<Option<User>, DbError> {
        let mut tables = self.tables.write().await;
        let user = tables.users.values_mut().find(|u| {
            u.reset_token_hash.as_deref() == Some(token_hash)
                && u.reset_expires_at.is_some_and(|expires| expires > now)
        });

        Ok(user.map(|user| {
            user.password_hash = new_password_hash.to_string();
            user.reset_token_hash = None;
            user.reset_expires_at = None;
            user.updated_at = now;
            user.clone()
        }))
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, DbError> {
        let tables = self.tables.read().await;
        let users = tables
            .users
            .values()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect();
        Ok(newest_first(users, |u: &User| u.created_at))
    }

    async fn count_users(&self, role: Option<Role>) -> Result<i64, DbError> {
        let tables = self.tables.read().await;
        let count = tables
            .users
            .values()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .count();
        Ok(count as i64)
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<PurgeCounts>, DbError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(None);
        }

        let owned: Vec<Uuid> = tables
            .properties
            .values()
            .filter(|p| p.agent_id == id)
            .map(|p| p.id)
            .collect();
        for property_id in &owned {
            tables.properties.remove(property_id);
        }

        let before = tables.appointments.len();
        tables
            .appointments
            .retain(|_, a| a.user_id != id && !owned.contains(&a.property_id));

        Ok(Some(PurgeCounts {
            listings: owned.len() as u64,
            appointments: (before - tables.appointments.len()) as u64,
        }))
    }
}

#[async_trait]
impl PropertyRepository for MemoryDatabase {
    async fn insert_property(&self, property: Property) -> Result<Property, DbError> {
        let mut tables = self.tables.write().await;
        tables.properties.insert(property.id, property.clone());
        Ok(property)
    }

    async fn property_by_id(&self, id: Uuid) -> Result<Option<Property>, DbError> {
        Ok(self.tables.read().await.properties.get(&id).cloned())
    }

    async fn update_property(&self, property: Property) -> Result<Property, DbError> {
        let mut tables = self.tables.write().await;
        tables.properties.insert(property.id, property.clone());
        Ok(property)
    }

    async fn delete_property(&self, id: Uuid) -> Result<Option<u64>, DbError> {
        let mut tables = self.tables.write().await;
        if tables.properties.remove(&id).is_none() {
            return Ok(None);
        }
        let before = tables.appointments.len();
        tables.appointments.retain(|_, a| a.property_id != id);
        Ok(Some((before - tables.appointments.len()) as u64))
    }

    async fn list_properties(&self, agent: Option<Uuid>) -> Result<Vec<Property>, DbError> {
        let tables = self.tables.read().await;
        let properties = tables
            .properties
            .values()
            .filter(|p| agent.is_none_or(|a| p.agent_id == a))
            .cloned()
            .collect();
        Ok(newest_first(properties, |p: &Property| p.created_at))
    }

    async fn count_properties(&self) -> Result<i64, DbError> {
        Ok(self.tables.read().await.properties.len() as i64)
    }
}

#[async_trait]
impl AppointmentRepository for MemoryDatabase {
    async fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, DbError> {
        let mut tables = self.tables.write().await;
        tables.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn appointment_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DbError> {
        Ok(self.tables.read().await.appointments.get(&id).cloned())
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<bool, DbError> {
        Ok(self.tables.write().await.appointments.remove(&id).is_some())
    }

    async fn list_appointments(&self, scope: AppointmentScope) -> Result<Vec<Appointment>, DbError> {
        let tables = self.tables.read().await;
        let appointments = tables
            .appointments
            .values()
            .filter(|a| match scope {
                AppointmentScope::All => true,
                AppointmentScope::Requester(user_id) => a.user_id == user_id,
                AppointmentScope::ListingAgent(agent_id) => tables
                    .properties
                    .get(&a.property_id)
                    .is_some_and(|p| p.agent_id == agent_id),
            })
            .cloned()
            .collect();
        Ok(newest_first(appointments, |a: &Appointment| a.created_at))
    }
}

#[async_trait]
impl MessageRepository for MemoryDatabase {
    async fn insert_message(&self, message: ContactMessage) -> Result<ContactMessage, DbError> {
        let mut tables = self.tables.write().await;
        tables.messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn message_by_id(&self, id: Uuid) -> Result<Option<ContactMessage>, DbError> {
        Ok(self.tables.read().await.messages.get(&id).cloned())
    }

    async fn delete_message(&self, id: Uuid) -> Result<bool, DbError> {
        Ok(self.tables.write().await.messages.remove(&id).is_some())
    }

    async fn list_messages(&self, scope: MessageScope) -> Result<Vec<ContactMessage>, DbError> {
        let tables = self.tables.read().await;
        let messages = tables
            .messages
            .values()
            .filter(|m| match scope {
                MessageScope::All => true,
                MessageScope::Recipient(user_id) => m.recipient_id == Some(user_id),
                MessageScope::Agent(agent_id) => {
                    m.sender_id == Some(agent_id)
                        || m.recipient_id == Some(agent_id)
                        || m
                            .property_id
                            .and_then(|id| tables.properties.get(&id))
                            .is_some_and(|p| p.agent_id == agent_id)
                }
            })
            .cloned()
            .collect();
        Ok(newest_first(messages, |m: &ContactMessage| m.created_at))
    }
}
