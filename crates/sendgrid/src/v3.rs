//! Typed request structs for the SendGrid v3 `mail/send` schema.
//!
//! Recipients, substitutions, and named content parts live in the shapes
//! the v3 endpoint expects. Every message carries exactly one
//! [`Personalization`], created up front; all to/cc/bcc entries and
//! substitution variables land on it.

use std::collections::BTreeMap;

use serde::Serialize;

use outbox_mail::Address;

use crate::message::SubstitutionValue;

/// An address entry on the wire: bare email plus optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<Address> for Recipient {
    fn from(addr: Address) -> Self {
        Self {
            email: addr.email,
            name: addr.name,
        }
    }
}

impl From<&Recipient> for Address {
    fn from(recipient: &Recipient) -> Self {
        Self {
            email: recipient.email.clone(),
            name: recipient.name.clone(),
        }
    }
}

/// A named content part (`text/plain`, `text/html`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub content_type: String,
    pub value: String,
}

/// An attachment record.
///
/// `content` carries base64-encoded bytes. Entries created from a bare
/// file reference leave it empty and set only `filename`; the reference is
/// resolved downstream, never read here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    pub filename: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
}

/// The shared recipient group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Personalization {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<Recipient>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Recipient>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Recipient>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub substitutions: BTreeMap<String, SubstitutionValue>,
}

/// Request body for the v3 `mail/send` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mail {
    /// Always exactly one entry; see [`Mail::personalization`].
    pub personalizations: Vec<Personalization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Recipient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Recipient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl Mail {
    /// Create an empty payload with its single recipient group in place.
    pub fn new() -> Self {
        Self {
            personalizations: vec![Personalization::default()],
            from: None,
            reply_to: None,
            subject: None,
            content: Vec::new(),
            attachments: Vec::new(),
            categories: Vec::new(),
            template_id: None,
        }
    }

    /// The shared recipient group.
    pub fn personalization(&self) -> &Personalization {
        &self.personalizations[0]
    }

    pub(crate) fn personalization_mut(&mut self) -> &mut Personalization {
        &mut self.personalizations[0]
    }

    /// Append a category unless an identical one is already present.
    pub fn add_category(&mut self, category: String) {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
    }

    /// Set the template id and attach substitutions to the recipient group.
    pub fn apply_template(
        &mut self,
        template_id: String,
        substitutions: impl IntoIterator<Item = (String, SubstitutionValue)>,
    ) {
        self.personalization_mut().substitutions.extend(substitutions);
        self.template_id = Some(template_id);
    }
}

impl Default for Mail {
    fn default() -> Self {
        Self::new()
    }
}
