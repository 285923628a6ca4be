//! Password reset tokens
//!
//! The raw token is 20 random bytes, hex-encoded, and only ever sent by
//! email. The store keeps its SHA-256 hex digest with a 10 minute expiry.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// How long a reset token stays valid
pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// A freshly generated token
#[derive(Debug, Clone)]
pub struct ResetToken {
    /// Sent to the principal
    pub raw: String,
    /// Stored
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    pub fn generate(now: DateTime<Utc>) -> Self {
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill_bytes(&mut bytes);
        let raw = hex::encode(bytes);

        Self {
            hash: hash_token(&raw),
            raw,
            expires_at: now + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        }
    }
}

pub fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
