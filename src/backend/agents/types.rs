//! Agent management request and response types.

use serde::{Deserialize, Serialize};

use crate::shared::{Property, PublicUser};

/// New agent account, created by an admin
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct CreateAgentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

/// Partial agent update; absent fields are left unchanged
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct UpdateAgentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

/// One agent with the listings it owns
#[derive(Serialize, Debug, Clone)]
pub struct AgentDetail {
    pub agent: PublicUser,
    pub properties: Vec<Property>,
}
