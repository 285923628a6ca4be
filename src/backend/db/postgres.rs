/**
 * PostgreSQL Store
 *
 * sqlx implementation of the repository traits. Roles and property types
 * are Postgres enums (`user_role`, `property_type`); listing locations are
 * stored as three columns and reassembled into a `Location` on read.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    AppointmentRepository, DbError, MessageRepository, PropertyRepository, PurgeCounts, UserRepository,
};
use crate::backend::auth::users::User;
use crate::backend::policy::{AppointmentScope, MessageScope};
use crate::shared::{Appointment, ContactMessage, Location, Property, PropertyType, Role};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, phone, bio, reset_token_hash, reset_expires_at, created_at, updated_at";

const PROPERTY_COLUMNS: &str = "id, agent_id, title, description, price, address, longitude, latitude, formatted_address, property_type, size, rooms, bedrooms, bathrooms, images, created_at, updated_at";

const APPOINTMENT_COLUMNS: &str = "id, property_id, user_id, date, time, message, created_at, updated_at";

const MESSAGE_COLUMNS: &str = "id, name, email, phone, subject, message, property_id, sender_id, recipient_id, created_at";

/// Postgres-backed store
#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url`
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Apply the migrations in `migrations/`
    pub async fn migrate(&self) -> Result<(), DbError> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a unique-constraint violation onto `DbError::Duplicate`
fn unique_violation(err: sqlx::Error, field: &str) -> DbError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DbError::Duplicate(field.to_string());
        }
    }
    DbError::Sqlx(err)
}

/// Flat row shape of the `properties` table
#[derive(sqlx::FromRow)]
struct PropertyRow {
    id: Uuid,
    agent_id: Uuid,
    title: String,
    description: Option<String>,
    price: f64,
    address: String,
    longitude: f64,
    latitude: f64,
    formatted_address: String,
    property_type: PropertyType,
    size: f64,
    rooms: i32,
    bedrooms: i32,
    bathrooms: i32,
    images: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PropertyRow> for Property {
    fn from(row: PropertyRow) -> Self {
        Property {
            id: row.id,
            agent_id: row.agent_id,
            title: row.title,
            description: row.description,
            price: row.price,
            address: row.address,
            location: Location::point(row.longitude, row.latitude, row.formatted_address),
            property_type: row.property_type,
            size: row.size,
            rooms: row.rooms,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            images: row.images,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl UserRepository for PgDatabase {
    async fn insert_user(&self, user: User) -> Result<User, DbError> {
        let sql = format!(
            r#"
            INSERT INTO users ({USER_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(&user.phone)
            .bind(&user.bio)
            .bind(&user.reset_token_hash)
            .bind(user.reset_expires_at)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation(e, "email"))
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_user(&self, user: User) -> Result<User, DbError> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, password_hash = $4, role = $5, phone = $6, bio = $7,
                reset_token_hash = $8, reset_expires_at = $9, updated_at = $10
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(&user.phone)
            .bind(&user.bio)
            .bind(&user.reset_token_hash)
            .bind(user.reset_expires_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation(e, "email"))
    }

    async fn consume_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
        new_password_hash: &str,
    ) -> Result<Option<User>, DbError> {
        let sql = format!(
            r#"
            UPDATE users
            SET password_hash = $1, reset_token_hash = NULL, reset_expires_at = NULL, updated_at = $3
            WHERE reset_token_hash = $2 AND reset_expires_at > $3
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(new_password_hash)
            .bind(token_hash)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, DbError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE ($1::user_role IS NULL OR role = $1) ORDER BY created_at DESC"
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(role)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn count_users(&self, role: Option<Role>) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE ($1::user_role IS NULL OR role = $1)",
        )
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<PurgeCounts>, DbError> {
        let mut tx = self.pool.begin().await?;

        let appointments = sqlx::query(
            r#"
            DELETE FROM appointments
            WHERE user_id = $1
               OR property_id IN (SELECT id FROM properties WHERE agent_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let listings = sqlx::query("DELETE FROM properties WHERE agent_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(PurgeCounts { listings, appointments }))
    }
}

#[async_trait]
impl PropertyRepository for PgDatabase {
    async fn insert_property(&self, property: Property) -> Result<Property, DbError> {
        let sql = format!(
            r#"
            INSERT INTO properties ({PROPERTY_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {PROPERTY_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PropertyRow>(&sql)
            .bind(property.id)
            .bind(property.agent_id)
            .bind(&property.title)
            .bind(&property.description)
            .bind(property.price)
            .bind(&property.address)
            .bind(property.location.longitude())
            .bind(property.location.latitude())
            .bind(&property.location.formatted_address)
            .bind(property.property_type)
            .bind(property.size)
            .bind(property.rooms)
            .bind(property.bedrooms)
            .bind(property.bathrooms)
            .bind(&property.images)
            .bind(property.created_at)
            .bind(property.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn property_by_id(&self, id: Uuid) -> Result<Option<Property>, DbError> {
        let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1");
        let row = sqlx::query_as::<_, PropertyRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Property::from))
    }

    async fn update_property(&self, property: Property) -> Result<Property, DbError> {
        let sql = format!(
            r#"
            UPDATE properties
            SET title = $2, description = $3, price = $4, address = $5, longitude = $6,
                latitude = $7, formatted_address = $8, property_type = $9, size = $10,
                rooms = $11, bedrooms = $12, bathrooms = $13, images = $14, updated_at = $15
            WHERE id = $1
            RETURNING {PROPERTY_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, PropertyRow>(&sql)
            .bind(property.id)
            .bind(&property.title)
            .bind(&property.description)
            .bind(property.price)
            .bind(&property.address)
            .bind(property.location.longitude())
            .bind(property.location.latitude())
            .bind(&property.location.formatted_address)
            .bind(property.property_type)
            .bind(property.size)
            .bind(property.rooms)
            .bind(property.bedrooms)
            .bind(property.bathrooms)
            .bind(&property.images)
            .bind(property.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn delete_property(&self, id: Uuid) -> Result<Option<u64>, DbError> {
        let mut tx = self.pool.begin().await?;

        let appointments = sqlx::query("DELETE FROM appointments WHERE property_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(appointments))
    }

    async fn list_properties(&self, agent: Option<Uuid>) -> Result<Vec<Property>, DbError> {
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE ($1::uuid IS NULL OR agent_id = $1) ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, PropertyRow>(&sql)
            .bind(agent)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Property::from).collect())
    }

    async fn count_properties(&self) -> Result<i64, DbError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM properties")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl AppointmentRepository for PgDatabase {
    async fn insert_appointment(&self, appointment: Appointment) -> Result<Appointment, DbError> {
        let sql = format!(
            r#"
            INSERT INTO appointments ({APPOINTMENT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        );
        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(appointment.id)
            .bind(appointment.property_id)
            .bind(appointment.user_id)
            .bind(appointment.date)
            .bind(&appointment.time)
            .bind(&appointment.message)
            .bind(appointment.created_at)
            .bind(appointment.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(appointment)
    }

    async fn appointment_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DbError> {
        let sql = format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1");
        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(appointment)
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_appointments(&self, scope: AppointmentScope) -> Result<Vec<Appointment>, DbError> {
        let columns = APPOINTMENT_COLUMNS
            .split(", ")
            .map(|c| format!("a.{}", c))
            .collect::<Vec<_>>()
            .join(", ");

        let appointments = match scope {
            AppointmentScope::All => {
                let sql = format!("SELECT {columns} FROM appointments a ORDER BY a.created_at DESC");
                sqlx::query_as::<_, Appointment>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
            AppointmentScope::ListingAgent(agent_id) => {
                let sql = format!(
                    r#"
                    SELECT {columns} FROM appointments a
                    JOIN properties p ON p.id = a.property_id
                    WHERE p.agent_id = $1
                    ORDER BY a.created_at DESC
                    "#
                );
                sqlx::query_as::<_, Appointment>(&sql)
                    .bind(agent_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            AppointmentScope::Requester(user_id) => {
                let sql = format!(
                    "SELECT {columns} FROM appointments a WHERE a.user_id = $1 ORDER BY a.created_at DESC"
                );
                sqlx::query_as::<_, Appointment>(&sql)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(appointments)
    }
}

#[async_trait]
impl MessageRepository for PgDatabase {
    async fn insert_message(&self, message: ContactMessage) -> Result<ContactMessage, DbError> {
        let sql = format!(
            r#"
            INSERT INTO messages ({MESSAGE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {MESSAGE_COLUMNS}
            "#
        );
        let message = sqlx::query_as::<_, ContactMessage>(&sql)
            .bind(message.id)
            .bind(&message.name)
            .bind(&message.email)
            .bind(&message.phone)
            .bind(&message.subject)
            .bind(&message.message)
            .bind(message.property_id)
            .bind(message.sender_id)
            .bind(message.recipient_id)
            .bind(message.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(message)
    }

    async fn message_by_id(&self, id: Uuid) -> Result<Option<ContactMessage>, DbError> {
        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1");
        let message = sqlx::query_as::<_, ContactMessage>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(message)
    }

    async fn delete_message(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_messages(&self, scope: MessageScope) -> Result<Vec<ContactMessage>, DbError> {
        let columns = MESSAGE_COLUMNS
            .split(", ")
            .map(|c| format!("m.{}", c))
            .collect::<Vec<_>>()
            .join(", ");

        let messages = match scope {
            MessageScope::All => {
                let sql = format!("SELECT {columns} FROM messages m ORDER BY m.created_at DESC");
                sqlx::query_as::<_, ContactMessage>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
            MessageScope::Agent(agent_id) => {
                let sql = format!(
                    r#"
                    SELECT {columns} FROM messages m
                    LEFT JOIN properties p ON p.id = m.property_id
                    WHERE m.sender_id = $1 OR m.recipient_id = $1 OR p.agent_id = $1
                    ORDER BY m.created_at DESC
                    "#
                );
                sqlx::query_as::<_, ContactMessage>(&sql)
                    .bind(agent_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            MessageScope::Recipient(user_id) => {
                let sql = format!(
                    "SELECT {columns} FROM messages m WHERE m.recipient_id = $1 ORDER BY m.created_at DESC"
                );
                sqlx::query_as::<_, ContactMessage>(&sql)
                    .bind(user_id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(messages)
    }
}
