//! Typed request structs for the pre-v3 SendGrid mail schema.
//!
//! This schema predates personalization groups: recipients are flat
//! parallel address/name sequences on the payload itself, and template
//! directives travel inside the `x-smtpapi` envelope. Its [`Display`]
//! form is the historical key:value-per-line dump with array fields
//! joined by commas.
//!
//! [`Display`]: std::fmt::Display

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use outbox_mail::Address;

use crate::message::SubstitutionValue;

/// Settings of the template filter directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSettings {
    pub enable: u8,
    pub template_id: String,
}

/// The template filter wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateFilter {
    pub settings: TemplateSettings,
}

/// Filter directives carried by the `x-smtpapi` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub templates: TemplateFilter,
}

/// The `x-smtpapi` envelope: substitutions plus filter directives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SmtpApi {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sub: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
}

impl SmtpApi {
    pub fn is_empty(&self) -> bool {
        self.sub.is_empty() && self.filters.is_none()
    }
}

/// Request body for the legacy `mail.send` endpoint.
///
/// The `to`/`toname` pairs (and the cc/bcc equivalents) are parallel
/// sequences; an entry without a display name keeps an empty slot so the
/// sequences stay aligned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Mail {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub toname: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ccname: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bccname: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fromname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replyto: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<String>,
    #[serde(rename = "x-smtpapi", skip_serializing_if = "SmtpApi::is_empty")]
    pub smtpapi: SmtpApi,
}

impl Mail {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a primary recipient to the parallel sequences.
    pub fn add_to(&mut self, addr: Address) {
        self.to.push(addr.email);
        self.toname.push(addr.name.unwrap_or_default());
    }

    /// Append a cc recipient to the parallel sequences.
    pub fn add_cc(&mut self, addr: Address) {
        self.cc.push(addr.email);
        self.ccname.push(addr.name.unwrap_or_default());
    }

    /// Append a bcc recipient to the parallel sequences.
    pub fn add_bcc(&mut self, addr: Address) {
        self.bcc.push(addr.email);
        self.bccname.push(addr.name.unwrap_or_default());
    }

    /// Append a category. This schema never deduplicated.
    pub fn add_category(&mut self, category: String) {
        self.category.push(category);
    }

    /// Enable the template filter and record substitutions, normalizing
    /// every value to a list.
    pub fn apply_template(
        &mut self,
        template_id: String,
        substitutions: impl IntoIterator<Item = (String, SubstitutionValue)>,
    ) {
        for (key, value) in substitutions {
            self.smtpapi.sub.insert(key, value.into_list());
        }
        self.smtpapi.filters = Some(Filters {
            templates: TemplateFilter {
                settings: TemplateSettings {
                    enable: 1,
                    template_id,
                },
            },
        });
    }

    /// Rebuild address values from a pair of parallel sequences.
    pub(crate) fn recipients(emails: &[String], names: &[String]) -> Vec<Address> {
        emails
            .iter()
            .zip(names)
            .map(|(email, name)| {
                if name.is_empty() {
                    Address::new(email.clone())
                } else {
                    Address::named(email.clone(), name.clone())
                }
            })
            .collect()
    }
}

impl fmt::Display for Mail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, key: &str, values: &[String]) -> fmt::Result {
            if values.is_empty() {
                return Ok(());
            }
            writeln!(f, "{key}: {}", values.join(","))
        }

        fn single(f: &mut fmt::Formatter<'_>, key: &str, value: Option<&str>) -> fmt::Result {
            match value {
                Some(value) => writeln!(f, "{key}: {value}"),
                None => Ok(()),
            }
        }

        list(f, "to", &self.to)?;
        list(f, "toname", &self.toname)?;
        list(f, "cc", &self.cc)?;
        list(f, "ccname", &self.ccname)?;
        list(f, "bcc", &self.bcc)?;
        list(f, "bccname", &self.bccname)?;
        single(f, "from", self.from.as_deref())?;
        single(f, "fromname", self.fromname.as_deref())?;
        single(f, "replyto", self.replyto.as_deref())?;
        single(f, "subject", self.subject.as_deref())?;
        single(f, "text", self.text.as_deref())?;
        single(f, "html", self.html.as_deref())?;
        list(f, "files", &self.files)?;
        list(f, "category", &self.category)?;
        if !self.smtpapi.is_empty() {
            let envelope = serde_json::to_string(&self.smtpapi).map_err(|_| fmt::Error)?;
            writeln!(f, "x-smtpapi: {envelope}")?;
        }
        Ok(())
    }
}
