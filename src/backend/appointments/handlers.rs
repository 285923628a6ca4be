//! Appointment handlers
//!
//! - POST /api/appointments - book a viewing
//! - GET /api/appointments - appointments visible to the caller
//! - GET /api/appointments/{id}
//! - DELETE /api/appointments/{id}

use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use crate::backend::appointments::service;
use crate::backend::appointments::types::AppointmentRequest;
use crate::backend::auth::MessageResponse;
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, Json, Path};
use crate::backend::server::state::AppState;
use crate::shared::{AppointmentView, ListResponse};

pub async fn create_appointment(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(request): Json<AppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentView>), BackendError> {
    let view = service::create(&state, &principal, request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn list_appointments(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<ListResponse<AppointmentView>>, BackendError> {
    let views = service::list(&state, &principal).await?;
    Ok(Json(views.into()))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentView>, BackendError> {
    service::get(&state, &principal, id).await.map(Json)
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    service::delete(&state, &principal, id).await?;
    Ok(Json(MessageResponse::new("Appointment deleted")))
}
