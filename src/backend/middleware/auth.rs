/**
 * Authentication Middleware
 *
 * Resolves the bearer credential on a request into a `Principal`:
 *
 * 1. Extract the token from the `Authorization: Bearer <token>` header
 * 2. Verify it and read the principal id
 * 3. Load the principal from the store, so the role is always current
 * 4. Attach the `Principal` to the request extensions
 *
 * `auth_middleware` rejects requests without a valid credential (401).
 * `optional_auth_middleware` lets them through anonymously but still
 * rejects a credential that is present and invalid.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::backend::db::UserRepository;
use crate::backend::error::BackendError;
use crate::backend::policy::Principal;
use crate::backend::server::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, BackendError> {
    let Some(header) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::warn!("Invalid Authorization header format");
            BackendError::unauthenticated("Not authorized, invalid token")
        })?;

    Ok(Some(token))
}

/// Verify `token` and load the principal it belongs to
pub async fn resolve_principal(state: &AppState, token: &str) -> Result<Principal, BackendError> {
    let user_id = state.sessions.verify(token)?;

    let user = state.db.user_by_id(user_id).await?.ok_or_else(|| {
        tracing::warn!(%user_id, "Token for unknown principal");
        BackendError::unauthenticated("Not authorized, user not found")
    })?;

    Ok(user.principal())
}

/// Require an authenticated principal
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers())?.ok_or_else(|| {
        tracing::warn!("Missing Authorization header");
        BackendError::unauthenticated("Not authorized, no token")
    })?;

    let principal = resolve_principal(&state, token).await?;
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Attach a principal when a credential is presented
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    if let Some(token) = bearer_token(request.headers())? {
        let principal = resolve_principal(&state, token).await?;
        request.extensions_mut().insert(principal);
    }

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated principal
///
/// Only valid on routes behind `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::warn!("Principal not found in request extensions");
                BackendError::unauthenticated("Not authenticated")
            })
    }
}

/// Axum extractor for an optional principal
#[derive(Clone, Debug)]
pub struct MaybeAuthUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(parts.extensions.get::<Principal>().cloned()))
    }
}
