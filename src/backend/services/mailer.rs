/**
 * Outgoing Email
 *
 * `Mailer` is the seam every email goes through: password reset links,
 * contact message notifications, direct messages and the public contact
 * form. `SmtpMailer` delivers over SMTP with lettre; `LogMailer` only logs
 * and is used when SMTP is not configured; `RecordingMailer` keeps the
 * emails in memory for tests.
 */

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::server::config::SmtpConfig;

/// An email ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
            html: None,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}

/// Returned to callers once the transport accepted an email
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    pub message_id: String,
    pub accepted: Vec<String>,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address {address}: {reason}")]
    Address { address: String, reason: String },

    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("delivery rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<DeliveryReceipt, MailError>;
}

fn message_id() -> String {
    format!("<{}@estatehub>", Uuid::new_v4())
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse::<Mailbox>().map_err(|e| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// SMTP delivery via lettre
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the transport
    ///
    /// Port 465 uses implicit TLS, any other port STARTTLS.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(config.username.clone(), config.password.clone()))
            .build();

        let from = parse_mailbox(&format!("{} <{}>", config.from_name, config.from_email))?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<DeliveryReceipt, MailError> {
        let to = parse_mailbox(&email.to)?;
        let id = message_id();

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .message_id(Some(id.clone()));

        let message = match email.html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(email.text, html))?,
            None => builder.singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_PLAIN)
                    .body(email.text),
            )?,
        };

        self.transport.send(message).await?;
        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");

        Ok(DeliveryReceipt {
            message_id: id,
            accepted: vec![email.to],
        })
    }
}

/// Logs emails instead of sending them
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<DeliveryReceipt, MailError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            body = %email.text,
            "SMTP not configured, email logged instead of sent"
        );
        Ok(DeliveryReceipt {
            message_id: message_id(),
            accepted: vec![email.to],
        })
    }
}

/// Keeps every email in memory; can be switched to reject deliveries
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    failing: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `send` fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().await.clone()
    }

    pub async fn last(&self) -> Option<OutgoingEmail> {
        self.sent.lock().await.last().cloned()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<DeliveryReceipt, MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Rejected(format!("delivery to {} disabled", email.to)));
        }
        let receipt = DeliveryReceipt {
            message_id: message_id(),
            accepted: vec![email.to.clone()],
        };
        self.sent.lock().await.push(email);
        Ok(receipt)
    }
}
