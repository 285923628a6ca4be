/**
 * Authorization Policy
 *
 * Decides whether a principal may perform an action on a resource, based on
 * the principal's role and on who owns the resource. Handlers load the
 * target first (so a missing resource is reported as 404, never 403) and
 * then ask the policy.
 *
 * # Rules
 *
 * - Anonymous callers may register, log in, reset passwords, read listings
 *   and create contact messages. Anything else is `Unauthenticated`.
 * - Admins may do everything.
 * - Agents manage the listings they own, read and delete appointments on
 *   those listings, read messages they sent, received, or that concern their
 *   listings, and may write directly to a principal.
 * - Users book appointments, read and delete their own appointments, and
 *   read messages addressed to them.
 * - Every authenticated principal may read and update its own profile and
 *   read the agent directory.
 */

use serde::Serialize;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::shared::Role;

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

/// A resource together with the ownership facts the policy needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Registration, login and password reset
    Account,
    /// The profile of `owner`
    Profile { owner: Uuid },
    /// Another principal's record (agent directory, user administration)
    Principal { role: Role },
    /// A listing owned by `agent`; for creation, the would-be owner
    Listing { agent: Uuid },
    /// A new appointment (the listing has already been resolved)
    NewAppointment,
    /// An appointment booked by `requester` on a listing owned by `listing_agent`
    Appointment { requester: Uuid, listing_agent: Uuid },
    /// A contact message
    Message {
        sender: Option<Uuid>,
        recipient: Option<Uuid>,
        listing_agent: Option<Uuid>,
    },
    /// A message addressed to a specific principal by email
    DirectMessage,
    /// Admin dashboard and statistics
    Dashboard,
}

/// Why a request was denied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    Unauthenticated,
    Forbidden(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    fn forbid(reason: &'static str) -> Self {
        Decision::Deny(Denial::Forbidden(reason))
    }

    fn allow_if(condition: bool, reason: &'static str) -> Self {
        if condition {
            Decision::Allow
        } else {
            Decision::forbid(reason)
        }
    }
}

/// Evaluate the policy
///
/// # Arguments
///
/// * `principal` - The caller, `None` when no valid credential was presented
/// * `action` - What the caller wants to do
/// * `resource` - The target with its ownership facts
pub fn evaluate(principal: Option<&Principal>, action: Action, resource: Resource) -> Decision {
    let principal = match principal {
        Some(p) => p,
        None => return evaluate_anonymous(action, resource),
    };

    match principal.role {
        Role::Admin => Decision::Allow,
        Role::Agent => evaluate_agent(principal.id, action, resource),
        Role::User => evaluate_user(principal.id, action, resource),
    }
}

fn evaluate_anonymous(action: Action, resource: Resource) -> Decision {
    match (action, resource) {
        (_, Resource::Account)
        | (Action::Read, Resource::Listing { .. })
        | (Action::Create, Resource::Message { .. }) => Decision::Allow,
        _ => Decision::Deny(Denial::Unauthenticated),
    }
}

fn evaluate_agent(me: Uuid, action: Action, resource: Resource) -> Decision {
    match resource {
        Resource::Account => Decision::Allow,
        Resource::Profile { owner } => own_profile(me, action, owner),
        Resource::Principal { role } => agent_directory(action, role),
        Resource::Listing { agent } => match action {
            Action::Read => Decision::Allow,
            Action::Create => Decision::allow_if(agent == me, "Agents can only create their own listings"),
            Action::Update => Decision::allow_if(agent == me, "Not authorized to update this property"),
            Action::Delete => Decision::allow_if(agent == me, "Not authorized to delete this property"),
        },
        Resource::NewAppointment => Decision::forbid("Only users can book appointments"),
        Resource::Appointment { listing_agent, .. } => match action {
            Action::Read | Action::Delete => {
                Decision::allow_if(listing_agent == me, "Not authorized to access this appointment")
            }
            Action::Create | Action::Update => Decision::forbid("Not authorized to modify this appointment"),
        },
        Resource::Message {
            sender,
            recipient,
            listing_agent,
        } => match action {
            Action::Create => Decision::Allow,
            Action::Read => Decision::allow_if(
                sender == Some(me) || recipient == Some(me) || listing_agent == Some(me),
                "Not authorized to read this message",
            ),
            Action::Update | Action::Delete => Decision::forbid("Only admins can modify messages"),
        },
        Resource::DirectMessage => {
            Decision::allow_if(action == Action::Create, "Not authorized to access direct messages")
        }
        Resource::Dashboard => Decision::forbid("Admin access required"),
    }
}

fn evaluate_user(me: Uuid, action: Action, resource: Resource) -> Decision {
    match resource {
        Resource::Account => Decision::Allow,
        Resource::Profile { owner } => own_profile(me, action, owner),
        Resource::Principal { role } => agent_directory(action, role),
        Resource::Listing { .. } => {
            Decision::allow_if(action == Action::Read, "Only agents can manage properties")
        }
        Resource::NewAppointment => {
            Decision::allow_if(action == Action::Create, "Not authorized to book this appointment")
        }
        Resource::Appointment { requester, .. } => match action {
            Action::Read | Action::Delete => {
                Decision::allow_if(requester == me, "Not authorized to access this appointment")
            }
            Action::Create | Action::Update => Decision::forbid("Not authorized to modify this appointment"),
        },
        Resource::Message { recipient, .. } => match action {
            Action::Create => Decision::Allow,
            Action::Read => Decision::allow_if(recipient == Some(me), "Not authorized to read this message"),
            Action::Update | Action::Delete => Decision::forbid("Only admins can modify messages"),
        },
        Resource::DirectMessage => Decision::forbid("Only agents and admins can message users directly"),
        Resource::Dashboard => Decision::forbid("Admin access required"),
    }
}

fn own_profile(me: Uuid, action: Action, owner: Uuid) -> Decision {
    match action {
        Action::Read | Action::Update => Decision::allow_if(owner == me, "Not authorized to access this profile"),
        Action::Create | Action::Delete => Decision::forbid("Admin access required"),
    }
}

fn agent_directory(action: Action, role: Role) -> Decision {
    Decision::allow_if(action == Action::Read && role == Role::Agent, "Admin access required")
}

/// Evaluate the policy and turn a denial into a `BackendError`
pub fn authorize(principal: Option<&Principal>, action: Action, resource: Resource) -> Result<(), BackendError> {
    match evaluate(principal, action, resource) {
        Decision::Allow => Ok(()),
        Decision::Deny(Denial::Unauthenticated) => {
            Err(BackendError::unauthenticated("Not authenticated"))
        }
        Decision::Deny(Denial::Forbidden(reason)) => {
            tracing::warn!(
                principal = ?principal.map(|p| p.id),
                ?action,
                ?resource,
                "Policy denied request"
            );
            Err(BackendError::forbidden(reason))
        }
    }
}

/// Which appointments a principal may list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentScope {
    All,
    /// Appointments on listings owned by this agent
    ListingAgent(Uuid),
    /// Appointments booked by this principal
    Requester(Uuid),
}

pub fn appointment_scope(principal: &Principal) -> AppointmentScope {
    match principal.role {
        Role::Admin => AppointmentScope::All,
        Role::Agent => AppointmentScope::ListingAgent(principal.id),
        Role::User => AppointmentScope::Requester(principal.id),
    }
}

/// Which messages a principal may list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageScope {
    All,
    /// Sent by, addressed to, or concerning a listing of this agent
    Agent(Uuid),
    /// Addressed to this principal
    Recipient(Uuid),
}

pub fn message_scope(principal: &Principal) -> MessageScope {
    match principal.role {
        Role::Admin => MessageScope::All,
        Role::Agent => MessageScope::Agent(principal.id),
        Role::User => MessageScope::Recipient(principal.id),
    }
}
