//! Admin handlers
//!
//! - GET /api/admin/dashboard
//! - GET /api/admin/users - optionally `?role=agent`
//! - DELETE /api/admin/users/{id}
//! - GET /api/admin/agents, DELETE /api/admin/agents/{id}
//! - GET /api/admin/properties, DELETE /api/admin/properties/{id}

use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::admin::service::{self, DashboardSummary};
use crate::backend::{agents, listings};
use crate::backend::auth::MessageResponse;
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, Json, Path, Query};
use crate::backend::server::state::AppState;
use crate::shared::{ListResponse, PropertyView, PublicUser, Role};

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub role: Option<Role>,
}

pub async fn dashboard_summary(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<DashboardSummary>, BackendError> {
    service::summary(&state, &principal).await.map(Json)
}

pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Query(query): Query<UserQuery>,
) -> Result<Json<ListResponse<PublicUser>>, BackendError> {
    let users = service::list_users(&state, &principal, query.role).await?;
    Ok(Json(users.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    service::delete_user(&state, &principal, id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

pub async fn list_agents(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<ListResponse<PublicUser>>, BackendError> {
    let agents = service::list_users(&state, &principal, Some(Role::Agent)).await?;
    Ok(Json(agents.into()))
}

pub async fn delete_agent(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    agents::service::delete(&state, &principal, id).await?;
    Ok(Json(MessageResponse::new("Agent deleted successfully")))
}

pub async fn list_properties(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<ListResponse<PropertyView>>, BackendError> {
    let views = service::list_properties(&state, &principal).await?;
    Ok(Json(views.into()))
}

pub async fn delete_property(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    listings::service::delete(&state, &principal, id).await?;
    Ok(Json(MessageResponse::new("Property deleted successfully")))
}
