//! Agent handlers
//!
//! - GET /api/agents
//! - GET /api/agents/{id} - agent with listings
//! - POST /api/agents - admin
//! - PUT /api/agents/{id} - admin
//! - DELETE /api/agents/{id} - admin

use axum::{extract::State, http::StatusCode};
use uuid::Uuid;

use crate::backend::agents::service;
use crate::backend::agents::types::{AgentDetail, CreateAgentRequest, UpdateAgentRequest};
use crate::backend::auth::MessageResponse;
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, Json, Path};
use crate::backend::server::state::AppState;
use crate::shared::{ListResponse, PublicUser};

pub async fn list_agents(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<ListResponse<PublicUser>>, BackendError> {
    let agents = service::list(&state, &principal).await?;
    Ok(Json(agents.into()))
}

pub async fn get_agent(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AgentDetail>, BackendError> {
    service::get(&state, &principal, id).await.map(Json)
}

pub async fn create_agent(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(request): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<PublicUser>), BackendError> {
    let agent = service::create(&state, &principal, request).await?;
    Ok((StatusCode::CREATED, Json(agent)))
}

pub async fn update_agent(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAgentRequest>,
) -> Result<Json<PublicUser>, BackendError> {
    service::update(&state, &principal, id, request).await.map(Json)
}

pub async fn delete_agent(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    service::delete(&state, &principal, id).await?;
    Ok(Json(MessageResponse::new("Agent profile deleted")))
}
