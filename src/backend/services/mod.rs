//! External Collaborators
//!
//! Thin wrappers over third-party services, each behind a trait so stores
//! and tests can swap the implementation.
//!
//! - **`geocoder`** - Address to coordinates (MapQuest over reqwest)
//! - **`mailer`** - Outgoing email (SMTP over lettre)

pub mod geocoder;
pub mod mailer;

pub use geocoder::{GeoLocation, GeocodeError, Geocoder, MapQuestGeocoder, StaticGeocoder};
pub use mailer::{DeliveryReceipt, LogMailer, MailError, Mailer, OutgoingEmail, RecordingMailer, SmtpMailer};
