//! Appointment request types.

use serde::{Deserialize, Serialize};

/// Booking request
///
/// `propertyId` is also accepted as `property`. Ids arrive as strings so a
/// malformed one is a field error rather than a body rejection.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[serde(alias = "property")]
    pub property_id: Option<String>,
    /// ISO 8601 date or date-time
    pub date: Option<String>,
    /// `HH:mm` or `HH:mm:ss`, 24-hour
    pub time: Option<String>,
    pub message: Option<String>,
}
