use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::message::ApiVersion;

/// Configuration for the SendGrid transport.
#[derive(Clone, Serialize, Deserialize)]
pub struct SendGridConfig {
    /// SendGrid API key, sent as the bearer token on every request.
    pub api_key: String,

    /// Base URL for the SendGrid API. Override this for testing against a
    /// mock server.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Which request schema messages composed by the transport target.
    #[serde(default)]
    pub api_version: ApiVersion,

    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_api_base_url() -> String {
    "https://api.sendgrid.com".to_owned()
}

impl std::fmt::Debug for SendGridConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendGridConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .field("api_version", &self.api_version)
            .field("headers", &self.headers)
            .finish()
    }
}

impl SendGridConfig {
    /// Create a new configuration with the given API key.
    ///
    /// Uses the production API base URL and the v3 schema.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: default_api_base_url(),
            api_version: ApiVersion::default(),
            headers: HashMap::new(),
        }
    }

    /// Override the API base URL (useful for testing).
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Select the request schema for composed messages.
    #[must_use]
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    /// Add a header to send with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}
