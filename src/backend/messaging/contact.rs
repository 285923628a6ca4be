//! Public contact form: validates the sender's input and emails it to the
//! given address as text and HTML.

use chrono::Utc;

use crate::backend::error::BackendError;
use crate::backend::messaging::types::{ContactEmailDetails, ContactEmailRequest, ContactEmailResponse};
use crate::backend::policy::{authorize, Action, Principal, Resource};
use crate::backend::server::state::AppState;
use crate::backend::services::{Mailer, OutgoingEmail};
use crate::shared::validation::Validator;

const PREVIEW_CHARS: usize = 100;

/// Escape text for inclusion in an HTML email body
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br />"),
            _ => out.push(c),
        }
    }
    out
}

fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_CHARS {
        let cut: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

pub async fn send_contact_email(
    state: &AppState,
    principal: Option<&Principal>,
    request: ContactEmailRequest,
) -> Result<ContactEmailResponse, BackendError> {
    authorize(
        principal,
        Action::Create,
        Resource::Message {
            sender: principal.map(|p| p.id),
            recipient: None,
            listing_agent: None,
        },
    )?;

    let mut v = Validator::new();
    let to = v.email("email", request.email.as_deref());
    let subject = v.require("subject", request.subject.as_deref(), "Subject is required").map(str::to_string);
    let body = v.require("message", request.message.as_deref(), "Message is required").map(str::to_string);
    v.finish()?;

    let (Some(to), Some(subject), Some(body)) = (to, subject, body) else {
        return Err(BackendError::validation("body", "Incomplete email"));
    };
    let name = request
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "User".to_string());

    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; line-height: 1.6; color: #333;\">\
         <h2>New Message from {name}</h2>\
         <p><strong>From:</strong> {email}</p>\
         <p><strong>Subject:</strong> {subject}</p><hr />\
         <p>{body}</p><hr />\
         <small style=\"color: #888;\">Received on {received}</small></div>",
        name = escape_html(&name),
        email = escape_html(&to),
        subject = escape_html(&subject),
        body = escape_html(&body),
        received = Utc::now().format("%Y-%m-%d %H:%M UTC"),
    );
    let email = OutgoingEmail::new(&to, &subject, &body).with_html(html);

    let receipt = state.mailer.send(email).await.map_err(|e| {
        tracing::error!(to = %to, error = %e, "Contact email failed");
        BackendError::from(e)
    })?;

    Ok(ContactEmailResponse {
        message: format!("Email successfully sent to {}", to),
        details: ContactEmailDetails {
            preview: preview(&body),
            to,
            subject,
            receipt,
        },
    })
}
