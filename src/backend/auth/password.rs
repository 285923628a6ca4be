//! Password hashing
//!
//! bcrypt is CPU-bound, so both operations run on the blocking pool.

use crate::backend::error::BackendError;

pub async fn hash_password(password: &str, cost: u32) -> Result<String, BackendError> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, BackendError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(valid)
}
