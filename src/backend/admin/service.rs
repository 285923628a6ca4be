/**
 * Admin Dashboard
 *
 * Platform-wide counts, the principal directory and principal removal.
 * Every operation here is admin-only.
 *
 * Removing a principal also removes what would otherwise point at nothing:
 * the appointments it booked and the listings it owns (agents, and admins
 * that published listings themselves) together with the appointments on
 * them. The store does this in one transaction. Contact messages keep their
 * free-text sender details and stay.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::db::{PropertyRepository, UserRepository};
use crate::backend::error::BackendError;
use crate::backend::policy::{authorize, Action, Principal, Resource};
use crate::backend::server::state::AppState;
use crate::backend::listings;
use crate::shared::{PropertyView, PublicUser, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_users: i64,
    pub total_agents: i64,
    pub total_properties: i64,
}

pub async fn summary(state: &AppState, principal: &Principal) -> Result<DashboardSummary, BackendError> {
    authorize(Some(principal), Action::Read, Resource::Dashboard)?;

    Ok(DashboardSummary {
        total_users: state.db.count_users(Some(Role::User)).await?,
        total_agents: state.db.count_users(Some(Role::Agent)).await?,
        total_properties: state.db.count_properties().await?,
    })
}

pub async fn list_users(
    state: &AppState,
    principal: &Principal,
    role: Option<Role>,
) -> Result<Vec<PublicUser>, BackendError> {
    authorize(Some(principal), Action::Read, Resource::Dashboard)?;
    let users = state.db.list_users(role).await?;
    Ok(users.iter().map(User::to_public).collect())
}

/// Every listing on the platform, with its agent
pub async fn list_properties(state: &AppState, principal: &Principal) -> Result<Vec<PropertyView>, BackendError> {
    authorize(Some(principal), Action::Read, Resource::Dashboard)?;
    listings::service::list(state, None).await
}

/// Delete `user` and everything that references it
pub(crate) async fn purge_principal(state: &AppState, user: &User) -> Result<(), BackendError> {
    let removed = state
        .db
        .delete_user(user.id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!(
        user_id = %user.id,
        role = %user.role,
        listings = removed.listings,
        appointments = removed.appointments,
        "Principal removed"
    );
    Ok(())
}

pub async fn delete_user(state: &AppState, principal: &Principal, id: Uuid) -> Result<(), BackendError> {
    let user = state
        .db
        .user_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    authorize(Some(principal), Action::Delete, Resource::Principal { role: user.role })?;

    if user.id == principal.id {
        return Err(BackendError::forbidden("Admins cannot delete their own account"));
    }

    purge_principal(state, &user).await
}
