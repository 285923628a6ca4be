//! Listing request types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fields of a listing as sent by clients
///
/// On create, title, price, address, type and size are required. On update
/// every field is optional and only the present ones change.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct PropertyInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub size: Option<f64>,
    pub rooms: Option<i32>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub images: Option<Vec<String>>,
}

/// Query string of `GET /api/properties`
#[derive(Debug, Default, Deserialize)]
pub struct PropertyQuery {
    /// Only listings owned by this agent
    pub agent: Option<Uuid>,
}
