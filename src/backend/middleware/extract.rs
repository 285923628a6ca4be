//! Request extractors with JSON rejections
//!
//! Drop-in replacements for axum's `Json`, `Path` and `Query`. A body, path
//! or query string that cannot be decoded becomes a `BackendError` (400 with
//! field-level `details`) instead of axum's plain-text rejection.
//!
//! `Json` also serializes responses, so handlers use it in both positions.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Request,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::backend::error::BackendError;
use crate::shared::SharedError;

/// JSON request body or response
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

/// Typed path parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

/// Typed query string
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

impl<S, T> FromRequestParts<S> for Path<T>
where
    axum::extract::Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) = axum::extract::Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl<S, T> FromRequestParts<S> for Query<T>
where
    axum::extract::Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) = axum::extract::Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Split an axum decode message into the offending field and serde's reason
///
/// Rejection texts read `<preamble>: <path>: <reason>`. When no usable path
/// is present the whole reason is attributed to `fallback`.
fn decode_failure(text: &str, fallback: &str) -> SharedError {
    let detail = text.split_once(": ").map_or(text, |(_, rest)| rest);

    match detail.split_once(": ") {
        Some((path, reason)) if !path.is_empty() && path != "." && !path.contains(char::is_whitespace) => {
            SharedError::serialization(path, reason)
        }
        _ => SharedError::serialization(fallback, detail),
    }
}

impl From<JsonRejection> for BackendError {
    fn from(rejection: JsonRejection) -> Self {
        match &rejection {
            JsonRejection::JsonDataError(err) => decode_failure(&err.body_text(), "body").into(),
            JsonRejection::JsonSyntaxError(err) => decode_failure(&err.body_text(), "body").into(),
            _ => SharedError::serialization("body", rejection.body_text()).into(),
        }
    }
}

impl From<PathRejection> for BackendError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(_) => SharedError::serialization("id", "Invalid ID").into(),
            other => Self::internal(format!("path extraction failed: {}", other.body_text())),
        }
    }
}

impl From<QueryRejection> for BackendError {
    fn from(rejection: QueryRejection) -> Self {
        decode_failure(&rejection.body_text(), "query").into()
    }
}
