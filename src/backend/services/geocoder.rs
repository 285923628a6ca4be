/**
 * Address Geocoding
 *
 * Turns a free-text address into a point and a formatted address. The
 * production implementation calls the MapQuest geocoding API; a static
 * table stands in when no API key is configured and in tests.
 */

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// First result of a geocoding lookup
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub longitude: f64,
    pub latitude: f64,
    pub formatted_address: String,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geocoder returned status {0}")]
    Status(u16),
}

/// Address lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `address`; `Ok(None)` when the provider has no match
    async fn geocode(&self, address: &str) -> Result<Option<GeoLocation>, GeocodeError>;
}

/// Default MapQuest endpoint
pub const MAPQUEST_BASE_URL: &str = "https://www.mapquestapi.com";

/// MapQuest geocoding client
pub struct MapQuestGeocoder {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MapQuestGeocoder {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Result<Self, GeocodeError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or_else(|| MAPQUEST_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct MapQuestResponse {
    #[serde(default)]
    results: Vec<MapQuestResult>,
}

#[derive(Debug, Deserialize)]
struct MapQuestResult {
    #[serde(default)]
    locations: Vec<MapQuestLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapQuestLocation {
    lat_lng: LatLng,
    #[serde(default)]
    street: String,
    /// City
    #[serde(default)]
    admin_area5: String,
    /// State
    #[serde(default)]
    admin_area3: String,
    #[serde(default)]
    postal_code: String,
    /// Country
    #[serde(default)]
    admin_area1: String,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl MapQuestLocation {
    fn formatted_address(&self) -> String {
        let state_zip = [self.admin_area3.as_str(), self.postal_code.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        [
            self.street.as_str(),
            self.admin_area5.as_str(),
            state_zip.as_str(),
            self.admin_area1.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[async_trait]
impl Geocoder for MapQuestGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoLocation>, GeocodeError> {
        let url = format!("{}/geocoding/v1/address", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("location", address)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body: MapQuestResponse = response.json().await?;
        let location = body
            .results
            .into_iter()
            .flat_map(|r| r.locations)
            .next();

        Ok(location.map(|loc| {
            let formatted = loc.formatted_address();
            GeoLocation {
                longitude: loc.lat_lng.lng,
                latitude: loc.lat_lng.lat,
                formatted_address: if formatted.is_empty() {
                    address.to_string()
                } else {
                    formatted
                },
            }
        }))
    }
}

/// Fixed address table
///
/// Lookups are case-insensitive on the trimmed address. Unknown addresses
/// yield `Ok(None)`, which the listing store reports as a validation error.
#[derive(Debug, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, GeoLocation>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, longitude: f64, latitude: f64) -> Self {
        self.entries.insert(
            address.trim().to_lowercase(),
            GeoLocation {
                longitude,
                latitude,
                formatted_address: address.trim().to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoLocation>, GeocodeError> {
        Ok(self.entries.get(&address.trim().to_lowercase()).cloned())
    }
}
