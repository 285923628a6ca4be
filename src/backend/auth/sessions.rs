/**
 * Session Tokens
 *
 * HS256 JWTs carrying the principal id (`sub`), issue time and expiry.
 * The token only identifies the principal; the role is read from the store
 * on every request so a role change takes effect immediately.
 */

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::server::config::AppConfig;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Principal ID
    pub sub: String,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Signing and verification keys derived from `JWT_SECRET`
#[derive(Clone)]
pub struct SessionKeys {
    keys: Arc<Keys>,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.jwt_secret, Duration::days(config.jwt_expires_days))
    }

    /// Create a token for `user_id`
    pub fn sign(&self, user_id: Uuid) -> Result<String, BackendError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.keys.encoding).map_err(|e| {
            tracing::error!("Failed to create token: {:?}", e);
            BackendError::internal("Failed to create session token")
        })
    }

    /// Verify a token and return the principal id it was issued for
    pub fn verify(&self, token: &str) -> Result<Uuid, BackendError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &Validation::default()).map_err(|e| {
            tracing::warn!("Invalid token: {:?}", e);
            BackendError::unauthenticated("Invalid or expired token")
        })?;

        Uuid::parse_str(&data.claims.sub).map_err(|e| {
            tracing::warn!("Invalid user ID in token: {:?}", e);
            BackendError::unauthenticated("Invalid or expired token")
        })
    }
}
