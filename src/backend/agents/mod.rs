//! Agents Module
//!
//! The agent directory and admin-managed agent accounts. Agents are
//! principals with role `agent`; there is no separate agent record.

pub mod types;
pub mod service;
pub mod handlers;

pub use types::{AgentDetail, CreateAgentRequest, UpdateAgentRequest};
