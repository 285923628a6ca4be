//! Listing handlers
//!
//! - GET /api/properties - list, optionally `?agent=<id>`
//! - GET /api/properties/{id}
//! - POST /api/properties - agents and admins
//! - PUT /api/properties/{id} - owning agent or admin
//! - DELETE /api/properties/{id} - owning agent or admin

use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use crate::backend::auth::MessageResponse;
use crate::backend::error::BackendError;
use crate::backend::listings::service;
use crate::backend::listings::types::{PropertyInput, PropertyQuery};
use crate::backend::middleware::{AuthUser, Json, Path, Query};
use crate::backend::server::state::AppState;
use crate::shared::{ListResponse, PropertyView};

pub async fn list_properties(
    State(state): State<AppState>,
    Query(query): Query<PropertyQuery>,
) -> Result<Json<ListResponse<PropertyView>>, BackendError> {
    let views = service::list(&state, query.agent).await?;
    Ok(Json(views.into()))
}

pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PropertyView>, BackendError> {
    service::get(&state, id).await.map(Json)
}

pub async fn create_property(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(input): Json<PropertyInput>,
) -> Result<(StatusCode, Json<PropertyView>), BackendError> {
    let view = service::create(&state, &principal, input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update_property(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
    Json(input): Json<PropertyInput>,
) -> Result<Json<PropertyView>, BackendError> {
    service::update(&state, &principal, id, input).await.map(Json)
}

pub async fn delete_property(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    service::delete(&state, &principal, id).await?;
    Ok(Json(MessageResponse::new("Property removed")))
}
