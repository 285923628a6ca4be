/**
 * Message Store
 *
 * Contact messages left on the public site and direct messages written by
 * agents and admins to registered principals.
 *
 * # Notifications
 *
 * A contact message about a listing is emailed to the platform admin
 * address and to the listing's agent before it is stored. If either email
 * fails the message is not stored and the caller gets an internal error.
 * A direct message is emailed to its recipient, then stored.
 */

use chrono::Utc;
use uuid::Uuid;

use crate::backend::db::{MessageRepository, PropertyRepository, UserRepository};
use crate::backend::error::BackendError;
use crate::backend::messaging::contact::escape_html;
use crate::backend::messaging::types::{ContactMessageRequest, DirectMessageRequest};
use crate::backend::policy::{authorize, message_scope, Action, Principal, Resource};
use crate::backend::server::state::AppState;
use crate::backend::services::{Mailer, OutgoingEmail};
use crate::shared::validation::{normalize_email, Validator};
use crate::shared::{ContactMessage, Property};

fn clean(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn notification(to: &str, message: &ContactMessage, property: &Property) -> OutgoingEmail {
    let subject = format!("New enquiry about {}", property.title);
    let text = format!(
        "{} <{}> wrote about \"{}\" ({}):\n\n{}\n\nPhone: {}",
        message.name,
        message.email,
        property.title,
        property.address,
        message.message,
        message.phone.as_deref().unwrap_or("-"),
    );
    let html = format!(
        "<h2>New enquiry about {title}</h2>\
         <p><strong>From:</strong> {name} ({email})</p>\
         <p><strong>Phone:</strong> {phone}</p>\
         <p><strong>Property:</strong> {address}</p><hr />\
         <p>{body}</p>",
        title = escape_html(&property.title),
        name = escape_html(&message.name),
        email = escape_html(&message.email),
        phone = escape_html(message.phone.as_deref().unwrap_or("-")),
        address = escape_html(&property.address),
        body = escape_html(&message.message),
    );
    OutgoingEmail::new(to, subject, text).with_html(html)
}

async fn load(state: &AppState, id: Uuid) -> Result<ContactMessage, BackendError> {
    state
        .db
        .message_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("Message not found"))
}

/// Store a contact message, notifying the admin and the listing's agent
///
/// `principal` is the logged-in sender, if any.
pub async fn create(
    state: &AppState,
    principal: Option<&Principal>,
    request: ContactMessageRequest,
) -> Result<ContactMessage, BackendError> {
    let mut v = Validator::new();
    let name = v.name("name", request.name.as_deref()).map(str::to_string);
    let email = v.email("email", request.email.as_deref());
    let body = v
        .require("message", request.message.as_deref(), "Message content is required")
        .map(str::to_string);
    v.phone("phone", request.phone.as_deref());
    let property_id = match clean(request.property) {
        Some(raw) => match raw.parse::<Uuid>() {
            Ok(id) => Some(id),
            Err(_) => {
                v.push("property", "Invalid property ID");
                None
            }
        },
        None => None,
    };
    v.finish()?;

    let (Some(name), Some(email), Some(body)) = (name, email, body) else {
        return Err(BackendError::validation("body", "Incomplete message"));
    };

    let property = match property_id {
        Some(id) => Some(
            state
                .db
                .property_by_id(id)
                .await?
                .ok_or_else(|| BackendError::not_found("Property not found"))?,
        ),
        None => None,
    };

    authorize(
        principal,
        Action::Create,
        Resource::Message {
            sender: principal.map(|p| p.id),
            recipient: None,
            listing_agent: property.as_ref().map(|p| p.agent_id),
        },
    )?;

    let message = ContactMessage {
        id: Uuid::new_v4(),
        name,
        email,
        phone: clean(request.phone),
        subject: clean(request.subject),
        message: body,
        property_id: property.as_ref().map(|p| p.id),
        sender_id: principal.map(|p| p.id),
        recipient_id: None,
        created_at: Utc::now(),
    };

    if let Some(property) = &property {
        let mut recipients = Vec::new();
        if let Some(admin) = &state.config.admin_email {
            recipients.push(admin.clone());
        }
        if let Some(agent) = state.db.user_by_id(property.agent_id).await? {
            if !recipients.contains(&agent.email) {
                recipients.push(agent.email);
            }
        }
        for to in recipients {
            if let Err(e) = state.mailer.send(notification(&to, &message, property)).await {
                tracing::error!(to = %to, property_id = %property.id, error = %e, "Message notification failed");
                return Err(e.into());
            }
        }
    }

    let message = state.db.insert_message(message).await?;
    tracing::info!(message_id = %message.id, property_id = ?message.property_id, "Contact message stored");
    Ok(message)
}

/// Email a registered principal and store the message with its recipient
pub async fn send_to_principal(
    state: &AppState,
    sender: &Principal,
    request: DirectMessageRequest,
) -> Result<ContactMessage, BackendError> {
    authorize(Some(sender), Action::Create, Resource::DirectMessage)?;

    let mut v = Validator::new();
    let to = v.email("email", request.email.as_deref());
    let body = v
        .require("message", request.message.as_deref(), "Message content is required")
        .map(str::to_string);
    v.finish()?;

    let (Some(to), Some(body)) = (to, body) else {
        return Err(BackendError::validation("body", "Incomplete message"));
    };

    let recipient = state
        .db
        .user_by_email(&normalize_email(&to))
        .await?
        .ok_or_else(|| BackendError::not_found("No user found with that email"))?;

    let subject = clean(request.subject);
    let email_subject = subject
        .clone()
        .unwrap_or_else(|| format!("Message from {}", sender.name));
    let text = format!("{} <{}> wrote:\n\n{}", sender.name, sender.email, body);
    let html = format!(
        "<p><strong>{}</strong> ({}) wrote:</p><hr /><p>{}</p>",
        escape_html(&sender.name),
        escape_html(&sender.email),
        escape_html(&body),
    );
    state
        .mailer
        .send(OutgoingEmail::new(&recipient.email, email_subject, text).with_html(html))
        .await
        .map_err(|e| {
            tracing::error!(to = %recipient.email, error = %e, "Direct message email failed");
            BackendError::from(e)
        })?;

    let message = ContactMessage {
        id: Uuid::new_v4(),
        name: sender.name.clone(),
        email: sender.email.clone(),
        phone: None,
        subject,
        message: body,
        property_id: None,
        sender_id: Some(sender.id),
        recipient_id: Some(recipient.id),
        created_at: Utc::now(),
    };
    let message = state.db.insert_message(message).await?;
    tracing::info!(message_id = %message.id, from = %sender.id, to = %recipient.id, "Direct message sent");
    Ok(message)
}

/// Messages visible to `principal`, newest first
pub async fn list(state: &AppState, principal: &Principal) -> Result<Vec<ContactMessage>, BackendError> {
    Ok(state.db.list_messages(message_scope(principal)).await?)
}

/// Visible messages that `principal` sent or received
pub async fn list_mine(state: &AppState, principal: &Principal) -> Result<Vec<ContactMessage>, BackendError> {
    let messages = list(state, principal).await?;
    Ok(messages
        .into_iter()
        .filter(|m| m.sender_id == Some(principal.id) || m.recipient_id == Some(principal.id))
        .collect())
}

pub async fn delete(state: &AppState, principal: &Principal, id: Uuid) -> Result<(), BackendError> {
    let message = load(state, id).await?;
    let listing_agent = match message.property_id {
        Some(property_id) => state.db.property_by_id(property_id).await?.map(|p| p.agent_id),
        None => None,
    };
    authorize(
        Some(principal),
        Action::Delete,
        Resource::Message {
            sender: message.sender_id,
            recipient: message.recipient_id,
            listing_agent,
        },
    )?;

    state.db.delete_message(message.id).await?;
    tracing::info!(message_id = %message.id, by = %principal.id, "Message deleted");
    Ok(())
}
