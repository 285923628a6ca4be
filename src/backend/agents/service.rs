/**
 * Agent Directory
 *
 * Any authenticated principal can browse agents and their listings.
 * Creating, editing and removing agent accounts is for admins.
 */

use chrono::Utc;
use uuid::Uuid;

use crate::backend::admin::service::purge_principal;
use crate::backend::agents::types::{AgentDetail, CreateAgentRequest, UpdateAgentRequest};
use crate::backend::auth::password::hash_password;
use crate::backend::auth::users::User;
use crate::backend::db::{PropertyRepository, UserRepository};
use crate::backend::error::BackendError;
use crate::backend::policy::{authorize, Action, Principal, Resource};
use crate::backend::server::state::AppState;
use crate::shared::validation::Validator;
use crate::shared::{PublicUser, Role};

const AGENT: Resource = Resource::Principal { role: Role::Agent };

fn clean(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

async fn load_agent(state: &AppState, id: Uuid) -> Result<User, BackendError> {
    state
        .db
        .user_by_id(id)
        .await?
        .filter(|u| u.role == Role::Agent)
        .ok_or_else(|| BackendError::not_found("Agent not found"))
}

pub async fn list(state: &AppState, principal: &Principal) -> Result<Vec<PublicUser>, BackendError> {
    authorize(Some(principal), Action::Read, AGENT)?;
    let agents = state.db.list_users(Some(Role::Agent)).await?;
    Ok(agents.iter().map(User::to_public).collect())
}

pub async fn get(state: &AppState, principal: &Principal, id: Uuid) -> Result<AgentDetail, BackendError> {
    let agent = load_agent(state, id).await?;
    authorize(Some(principal), Action::Read, AGENT)?;

    let properties = state.db.list_properties(Some(agent.id)).await?;
    Ok(AgentDetail {
        agent: agent.to_public(),
        properties,
    })
}

pub async fn create(
    state: &AppState,
    principal: &Principal,
    request: CreateAgentRequest,
) -> Result<PublicUser, BackendError> {
    authorize(Some(principal), Action::Create, AGENT)?;

    let mut v = Validator::new();
    let name = v.name("name", request.name.as_deref());
    let email = v.email("email", request.email.as_deref());
    let password = v.password("password", request.password.as_deref());
    v.phone("phone", request.phone.as_deref());
    v.finish()?;

    let (name, email, password) = (
        name.unwrap_or_default(),
        email.unwrap_or_default(),
        password.unwrap_or_default(),
    );

    if state.db.user_by_email(&email).await?.is_some() {
        return Err(BackendError::conflict("Email already exists"));
    }

    let mut agent = User::new(name, email, hash_password(password, state.config.bcrypt_cost).await?, Role::Agent);
    agent.phone = clean(request.phone);
    agent.bio = clean(request.bio);

    let agent = state.db.insert_user(agent).await?;
    tracing::info!(agent_id = %agent.id, by = %principal.id, "Agent created");
    Ok(agent.to_public())
}

pub async fn update(
    state: &AppState,
    principal: &Principal,
    id: Uuid,
    request: UpdateAgentRequest,
) -> Result<PublicUser, BackendError> {
    let mut agent = load_agent(state, id).await?;
    authorize(Some(principal), Action::Update, AGENT)?;

    let mut v = Validator::new();
    let name = request.name.as_deref().and_then(|n| v.name("name", Some(n)));
    let email = request.email.as_deref().and_then(|e| v.email("email", Some(e)));
    v.phone("phone", request.phone.as_deref());
    v.finish()?;

    if let Some(email) = email {
        if email != agent.email {
            if state.db.user_by_email(&email).await?.is_some_and(|u| u.id != agent.id) {
                return Err(BackendError::conflict("Email already in use"));
            }
            agent.email = email;
        }
    }
    if let Some(name) = name {
        agent.name = name.to_string();
    }
    if request.phone.is_some() {
        agent.phone = clean(request.phone);
    }
    if request.bio.is_some() {
        agent.bio = clean(request.bio);
    }
    agent.updated_at = Utc::now();

    let agent = state.db.update_user(agent).await?;
    tracing::info!(agent_id = %agent.id, by = %principal.id, "Agent updated");
    Ok(agent.to_public())
}

/// Remove an agent account with its listings
pub async fn delete(state: &AppState, principal: &Principal, id: Uuid) -> Result<(), BackendError> {
    let agent = load_agent(state, id).await?;
    authorize(Some(principal), Action::Delete, AGENT)?;
    purge_principal(state, &agent).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::TestContext;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn new_agent(email: &str) -> CreateAgentRequest {
        CreateAgentRequest {
            name: Some("Agent Smith".to_string()),
            email: Some(email.to_string()),
            password: Some("secret12".to_string()),
            phone: Some("+14155550123".to_string()),
            bio: Some("  Ten years downtown ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_admin_creates_agents() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("root@example.com", Role::Admin).await;

        let agent = create(&ctx.state, &admin, new_agent("Smith@Example.com")).await.unwrap();
        assert_eq!(agent.role, Role::Agent);
        assert_eq!(agent.email, "smith@example.com");
        assert_eq!(agent.bio.as_deref(), Some("Ten years downtown"));

        assert_matches!(
            create(&ctx.state, &admin, new_agent("smith@example.com")).await,
            Err(BackendError::Conflict { .. })
        );
    }

    #[tokio::test]
    async fn test_only_admins_manage_agents() {
        let ctx = TestContext::new();
        let agent = ctx.seed_user("a@example.com", Role::Agent).await;
        let user = ctx.seed_user("u@example.com", Role::User).await;

        assert_matches!(
            create(&ctx.state, &agent, new_agent("x@example.com")).await,
            Err(BackendError::Forbidden { .. })
        );
        assert_matches!(
            update(&ctx.state, &user, agent.id, UpdateAgentRequest::default()).await,
            Err(BackendError::Forbidden { .. })
        );
        assert_matches!(delete(&ctx.state, &agent, agent.id).await, Err(BackendError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_directory_with_listings() {
        let ctx = TestContext::new();
        let agent = ctx.seed_user("a@example.com", Role::Agent).await;
        let user = ctx.seed_user("u@example.com", Role::User).await;
        ctx.seed_property(&agent).await;

        let agents = list(&ctx.state, &user).await.unwrap();
        assert_eq!(agents.len(), 1);

        let detail = get(&ctx.state, &user, agent.id).await.unwrap();
        assert_eq!(detail.agent.id, agent.id);
        assert_eq!(detail.properties.len(), 1);

        assert_matches!(get(&ctx.state, &user, user.id).await, Err(BackendError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_checks_email_uniqueness() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("root@example.com", Role::Admin).await;
        let agent = ctx.seed_user("a@example.com", Role::Agent).await;
        ctx.seed_user("taken@example.com", Role::User).await;

        let taken = UpdateAgentRequest {
            email: Some("taken@example.com".to_string()),
            ..Default::default()
        };
        assert_matches!(
            update(&ctx.state, &admin, agent.id, taken).await,
            Err(BackendError::Conflict { .. })
        );

        let change = UpdateAgentRequest {
            name: Some("Renamed Agent".to_string()),
            phone: Some("".to_string()),
            ..Default::default()
        };
        let updated = update(&ctx.state, &admin, agent.id, change).await.unwrap();
        assert_eq!(updated.name, "Renamed Agent");
        assert_eq!(updated.phone, None);
    }

    #[tokio::test]
    async fn test_delete_agent_removes_listings() {
        let ctx = TestContext::new();
        let admin = ctx.seed_user("root@example.com", Role::Admin).await;
        let agent = ctx.seed_user("a@example.com", Role::Agent).await;
        let listing = ctx.seed_property(&agent).await;

        delete(&ctx.state, &admin, agent.id).await.unwrap();
        assert!(ctx.state.db.property_by_id(listing.id).await.unwrap().is_none());
        assert_matches!(get(&ctx.state, &admin, agent.id).await, Err(BackendError::NotFound { .. }));
    }
}
