//! Appointment types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::user::UserSummary;

/// A viewing appointment booked by a user on a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Appointment {
    pub id: Uuid,
    pub property_id: Uuid,
    /// Principal that booked the appointment
    pub user_id: Uuid,
    pub date: NaiveDate,
    /// `HH:mm` or `HH:mm:ss`
    pub time: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Title and address of the booked listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySummary {
    pub id: Uuid,
    pub title: String,
    pub address: String,
}

/// An appointment with its listing and requester resolved
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub property: Option<PropertySummary>,
    pub user: Option<UserSummary>,
}
