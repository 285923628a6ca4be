//! Messaging handlers
//!
//! - POST /api/messages - public contact message (sender attached when logged in)
//! - GET /api/messages - messages visible to the caller
//! - GET /api/messages/mine - visible messages the caller sent or received
//! - POST /api/messages/send - agent or admin writes to a principal
//! - DELETE /api/messages/{id} - admin
//! - POST /api/email/send - public contact form

use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use crate::backend::auth::MessageResponse;
use crate::backend::error::BackendError;
use crate::backend::messaging::types::{
    ContactEmailRequest, ContactEmailResponse, ContactMessageRequest, DirectMessageRequest,
};
use crate::backend::messaging::{contact, service};
use crate::backend::middleware::{AuthUser, Json, MaybeAuthUser, Path};
use crate::backend::server::state::AppState;
use crate::shared::{ContactMessage, ListResponse};

pub async fn create_message(
    State(state): State<AppState>,
    MaybeAuthUser(principal): MaybeAuthUser,
    Json(request): Json<ContactMessageRequest>,
) -> Result<(StatusCode, Json<ContactMessage>), BackendError> {
    let message = service::create(&state, principal.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn list_messages(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<ListResponse<ContactMessage>>, BackendError> {
    let messages = service::list(&state, &principal).await?;
    Ok(Json(messages.into()))
}

pub async fn list_my_messages(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<ListResponse<ContactMessage>>, BackendError> {
    let messages = service::list_mine(&state, &principal).await?;
    Ok(Json(messages.into()))
}

pub async fn send_direct_message(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(request): Json<DirectMessageRequest>,
) -> Result<(StatusCode, Json<ContactMessage>), BackendError> {
    let message = service::send_to_principal(&state, &principal, request).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn delete_message(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    service::delete(&state, &principal, id).await?;
    Ok(Json(MessageResponse::new("Message deleted successfully")))
}

pub async fn send_contact_email(
    State(state): State<AppState>,
    MaybeAuthUser(principal): MaybeAuthUser,
    Json(request): Json<ContactEmailRequest>,
) -> Result<Json<ContactEmailResponse>, BackendError> {
    contact::send_contact_email(&state, principal.as_ref(), request).await.map(Json)
}
