//! The fluent message builder shared by both SendGrid schemas.

use std::fmt;

use serde::{Deserialize, Serialize};

use outbox_mail::{Address, Attachment, MailError};

use crate::{legacy, v3};

/// Which SendGrid request schema a message targets.
///
/// The two schemas are not wire-compatible, so each keeps its own payload
/// module and its own policies; nothing is shared between the code paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// The v3 `mail/send` schema: one shared personalization group and
    /// typed JSON content parts.
    #[default]
    V3,
    /// The pre-v3 schema: flat parallel recipient sequences and the
    /// `x-smtpapi` envelope.
    Legacy,
}

/// A template substitution value: one replacement or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SubstitutionValue {
    One(String),
    Many(Vec<String>),
}

impl SubstitutionValue {
    /// Normalize to a list, wrapping a single value.
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

impl From<&str> for SubstitutionValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_owned())
    }
}

impl From<String> for SubstitutionValue {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for SubstitutionValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for SubstitutionValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_owned).collect())
    }
}

/// The schema-specific payload behind a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    V3(v3::Mail),
    Legacy(legacy::Mail),
}

/// An outgoing mail message.
///
/// Assembled through chained setters and handed to
/// [`SendGridTransport::send`](crate::SendGridTransport::send). Infallible
/// setters consume and return the message; the raw-content attachment
/// setters return a `Result` because the legacy schema cannot carry them.
///
/// ```
/// use outbox_sendgrid::Message;
///
/// let message = Message::v3()
///     .with_from(("noreply@example.com", "Example"))
///     .with_to("user@example.com")
///     .with_subject("Welcome")
///     .with_text_body("Hello!");
///
/// assert_eq!(message.subject(), Some("Welcome"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    payload: Payload,
}

impl Message {
    /// Create an empty message for the given schema.
    pub fn new(version: ApiVersion) -> Self {
        let payload = match version {
            ApiVersion::V3 => Payload::V3(v3::Mail::new()),
            ApiVersion::Legacy => Payload::Legacy(legacy::Mail::new()),
        };
        Self { payload }
    }

    /// Create a message targeting the v3 schema.
    pub fn v3() -> Self {
        Self::new(ApiVersion::V3)
    }

    /// Create a message targeting the pre-v3 schema.
    pub fn legacy() -> Self {
        Self::new(ApiVersion::Legacy)
    }

    /// The schema this message targets.
    pub fn api_version(&self) -> ApiVersion {
        match self.payload {
            Payload::V3(_) => ApiVersion::V3,
            Payload::Legacy(_) => ApiVersion::Legacy,
        }
    }

    /// The underlying typed payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Set the sender.
    #[must_use]
    pub fn with_from(mut self, from: impl Into<Address>) -> Self {
        let from = from.into();
        match &mut self.payload {
            Payload::V3(mail) => mail.from = Some(from.into()),
            Payload::Legacy(mail) => {
                mail.from = Some(from.email);
                mail.fromname = from.name;
            }
        }
        self
    }

    /// Set the reply-to address. The legacy schema stores only the bare
    /// address; any display name is dropped there.
    #[must_use]
    pub fn with_reply_to(mut self, reply_to: impl Into<Address>) -> Self {
        let reply_to = reply_to.into();
        match &mut self.payload {
            Payload::V3(mail) => mail.reply_to = Some(reply_to.into()),
            Payload::Legacy(mail) => mail.replyto = Some(reply_to.email),
        }
        self
    }

    /// Add a primary recipient.
    #[must_use]
    pub fn with_to(mut self, to: impl Into<Address>) -> Self {
        let to = to.into();
        match &mut self.payload {
            Payload::V3(mail) => mail.personalization_mut().to.push(to.into()),
            Payload::Legacy(mail) => mail.add_to(to),
        }
        self
    }

    /// Add several primary recipients. Entries may mix bare addresses and
    /// (address, name) pairs.
    #[must_use]
    pub fn with_to_many(self, to: impl IntoIterator<Item = impl Into<Address>>) -> Self {
        to.into_iter().fold(self, |message, addr| message.with_to(addr))
    }

    /// Add a cc recipient.
    #[must_use]
    pub fn with_cc(mut self, cc: impl Into<Address>) -> Self {
        let cc = cc.into();
        match &mut self.payload {
            Payload::V3(mail) => mail.personalization_mut().cc.push(cc.into()),
            Payload::Legacy(mail) => mail.add_cc(cc),
        }
        self
    }

    /// Add several cc recipients.
    #[must_use]
    pub fn with_cc_many(self, cc: impl IntoIterator<Item = impl Into<Address>>) -> Self {
        cc.into_iter().fold(self, |message, addr| message.with_cc(addr))
    }

    /// Add a bcc recipient.
    #[must_use]
    pub fn with_bcc(mut self, bcc: impl Into<Address>) -> Self {
        let bcc = bcc.into();
        match &mut self.payload {
            Payload::V3(mail) => mail.personalization_mut().bcc.push(bcc.into()),
            Payload::Legacy(mail) => mail.add_bcc(bcc),
        }
        self
    }

    /// Add several bcc recipients.
    #[must_use]
    pub fn with_bcc_many(self, bcc: impl IntoIterator<Item = impl Into<Address>>) -> Self {
        bcc.into_iter().fold(self, |message, addr| message.with_bcc(addr))
    }

    /// Set the subject line.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        match &mut self.payload {
            Payload::V3(mail) => mail.subject = Some(subject),
            Payload::Legacy(mail) => mail.subject = Some(subject),
        }
        self
    }

    /// Set the plain-text body.
    #[must_use]
    pub fn with_text_body(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        match &mut self.payload {
            Payload::V3(mail) => mail.content.push(v3::Content {
                content_type: "text/plain".to_owned(),
                value: text,
            }),
            Payload::Legacy(mail) => mail.text = Some(text),
        }
        self
    }

    /// Set the HTML body. An empty string is ignored so text-only mail
    /// never carries a blank HTML alternative.
    #[must_use]
    pub fn with_html_body(mut self, html: impl Into<String>) -> Self {
        let html = html.into();
        if html.is_empty() {
            return self;
        }
        match &mut self.payload {
            Payload::V3(mail) => mail.content.push(v3::Content {
                content_type: "text/html".to_owned(),
                value: html,
            }),
            Payload::Legacy(mail) => mail.html = Some(html),
        }
        self
    }

    /// Reference an attachment by file path or identifier. The file is not
    /// read here; the reference is passed through to the provider payload.
    #[must_use]
    pub fn with_attachment(mut self, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        match &mut self.payload {
            Payload::V3(mail) => mail.attachments.push(v3::Attachment {
                filename,
                ..v3::Attachment::default()
            }),
            Payload::Legacy(mail) => mail.files.push(filename),
        }
        self
    }

    /// Attach raw content. Only the v3 schema can carry arbitrary
    /// attachment records; on the legacy schema this fails with
    /// [`MailError::Unsupported`].
    pub fn with_attachment_content(self, attachment: Attachment) -> Result<Self, MailError> {
        self.push_content_attachment(attachment, false)
    }

    /// Embed raw content for inline use, referenced from the HTML body by
    /// its content id. Only the v3 schema can carry attachment records.
    pub fn with_inline_content(self, attachment: Attachment) -> Result<Self, MailError> {
        self.push_content_attachment(attachment, true)
    }

    fn push_content_attachment(
        mut self,
        attachment: Attachment,
        inline: bool,
    ) -> Result<Self, MailError> {
        match &mut self.payload {
            Payload::V3(mail) => {
                use base64::Engine;
                let content =
                    base64::engine::general_purpose::STANDARD.encode(&attachment.content);
                mail.attachments.push(v3::Attachment {
                    content,
                    filename: attachment.filename,
                    content_type: attachment.content_type,
                    disposition: inline.then(|| "inline".to_owned()),
                    content_id: attachment.content_id,
                });
                Ok(self)
            }
            Payload::Legacy(_) => Err(MailError::Unsupported(
                "raw-content attachments require the v3 mail schema".into(),
            )),
        }
    }

    /// Charset is not part of the SendGrid model; kept for parity with the
    /// mail contract and ignored.
    #[must_use]
    pub fn with_charset(self, _charset: impl Into<String>) -> Self {
        self
    }

    /// Always `None`; SendGrid has no charset concept.
    pub fn charset(&self) -> Option<&str> {
        None
    }

    /// Add categories. The v3 schema drops exact duplicates of categories
    /// already present; the legacy schema appends unconditionally.
    #[must_use]
    pub fn with_categories(
        mut self,
        categories: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        for category in categories {
            let category = category.into();
            match &mut self.payload {
                Payload::V3(mail) => mail.add_category(category),
                Payload::Legacy(mail) => mail.add_category(category),
            }
        }
        self
    }

    /// Select a stored template and its substitution variables.
    ///
    /// On the v3 schema the substitutions attach to the shared recipient
    /// group and the template id lands on the payload; on the legacy
    /// schema they become an `x-smtpapi` filter directive with every
    /// value normalized to a list.
    #[must_use]
    pub fn with_template(
        mut self,
        template_id: impl Into<String>,
        substitutions: impl IntoIterator<Item = (impl Into<String>, impl Into<SubstitutionValue>)>,
    ) -> Self {
        let template_id = template_id.into();
        let substitutions = substitutions
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()));
        match &mut self.payload {
            Payload::V3(mail) => mail.apply_template(template_id, substitutions),
            Payload::Legacy(mail) => mail.apply_template(template_id, substitutions),
        }
        self
    }

    /// The sender, when set.
    pub fn from_address(&self) -> Option<Address> {
        match &self.payload {
            Payload::V3(mail) => mail.from.as_ref().map(Address::from),
            Payload::Legacy(mail) => mail.from.as_ref().map(|email| match &mail.fromname {
                Some(name) => Address::named(email.clone(), name.clone()),
                None => Address::new(email.clone()),
            }),
        }
    }

    /// The reply-to address, when set.
    pub fn reply_to_address(&self) -> Option<Address> {
        match &self.payload {
            Payload::V3(mail) => mail.reply_to.as_ref().map(Address::from),
            Payload::Legacy(mail) => mail.replyto.as_ref().map(|email| Address::new(email.clone())),
        }
    }

    /// Primary recipients in insertion order.
    pub fn to(&self) -> Vec<Address> {
        match &self.payload {
            Payload::V3(mail) => mail.personalization().to.iter().map(Address::from).collect(),
            Payload::Legacy(mail) => legacy::Mail::recipients(&mail.to, &mail.toname),
        }
    }

    /// Cc recipients in insertion order.
    pub fn cc(&self) -> Vec<Address> {
        match &self.payload {
            Payload::V3(mail) => mail.personalization().cc.iter().map(Address::from).collect(),
            Payload::Legacy(mail) => legacy::Mail::recipients(&mail.cc, &mail.ccname),
        }
    }

    /// Bcc recipients in insertion order.
    pub fn bcc(&self) -> Vec<Address> {
        match &self.payload {
            Payload::V3(mail) => mail.personalization().bcc.iter().map(Address::from).collect(),
            Payload::Legacy(mail) => legacy::Mail::recipients(&mail.bcc, &mail.bccname),
        }
    }

    /// The subject line, when set.
    pub fn subject(&self) -> Option<&str> {
        match &self.payload {
            Payload::V3(mail) => mail.subject.as_deref(),
            Payload::Legacy(mail) => mail.subject.as_deref(),
        }
    }

    /// Categories in the order they will be submitted.
    pub fn categories(&self) -> &[String] {
        match &self.payload {
            Payload::V3(mail) => &mail.categories,
            Payload::Legacy(mail) => &mail.category,
        }
    }

    /// The JSON document submitted to the mail endpoint.
    pub fn to_json(&self) -> Result<serde_json::Value, MailError> {
        serde_json::to_value(&self.payload).map_err(|e| MailError::Serialization(e.to_string()))
    }
}

impl fmt::Display for Message {
    /// The debugging form: the JSON document for the v3 schema, the
    /// key:value-per-line dump for the legacy schema.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::V3(mail) => {
                let json = serde_json::to_string(mail).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
            Payload::Legacy(mail) => mail.fmt(f),
        }
    }
}
