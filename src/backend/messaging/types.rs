/**
 * Messaging Types
 *
 * Request bodies for contact messages, direct messages and the public
 * contact form, and the contact form's delivery response.
 */

use serde::{Deserialize, Serialize};

use crate::backend::services::DeliveryReceipt;

/// A contact message from the public site
///
/// Sender details are free text; `property` ties the message to a listing.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ContactMessageRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    #[serde(alias = "propertyId")]
    pub property: Option<String>,
}

/// A message an agent or admin writes to a registered principal
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct DirectMessageRequest {
    /// Recipient's email
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

/// Public contact form
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ContactEmailRequest {
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub name: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContactEmailDetails {
    pub to: String,
    pub subject: String,
    /// First 100 characters of the body
    pub preview: String,
    #[serde(flatten)]
    pub receipt: DeliveryReceipt,
}

#[derive(Serialize, Debug, Clone)]
pub struct ContactEmailResponse {
    pub message: String,
    pub details: ContactEmailDetails,
}
