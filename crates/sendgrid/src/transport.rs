use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use outbox_mail::{MailError, Transport};

use crate::config::SendGridConfig;
use crate::error::SendGridError;
use crate::message::{ApiVersion, Message};

/// Mail transport that submits messages to the SendGrid HTTP API.
///
/// The configuration is validated and the HTTP client built up front in the
/// constructor; both are reused for the lifetime of the transport. One
/// outbound request is made per send. Retries, backoff, and rate limiting
/// are left to the caller.
pub struct SendGridTransport {
    config: SendGridConfig,
    client: Client,
}

impl std::fmt::Debug for SendGridTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendGridTransport")
            .field("config", &self.config)
            .field("client", &"<Client>")
            .finish()
    }
}

impl SendGridTransport {
    /// Create a transport from the given configuration.
    ///
    /// Fails with [`MailError::Configuration`] when no API key is set.
    pub fn new(config: SendGridConfig) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| MailError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Self::with_client(config, client)
    }

    /// Create a transport with a custom HTTP client.
    ///
    /// Useful for testing or for sharing a connection pool across
    /// transports. The API key is still validated.
    pub fn with_client(config: SendGridConfig, client: Client) -> Result<Self, MailError> {
        if config.api_key.is_empty() {
            return Err(SendGridError::MissingApiKey.into());
        }
        Ok(Self { config, client })
    }

    /// Create an empty [`Message`] targeting the configured API version.
    pub fn compose(&self) -> Message {
        Message::new(self.config.api_version)
    }

    /// The mail endpoint for the given schema.
    fn mail_endpoint(&self, version: ApiVersion) -> String {
        match version {
            ApiVersion::V3 => format!("{}/v3/mail/send", self.config.api_base_url),
            ApiVersion::Legacy => format!("{}/api/mail.send.json", self.config.api_base_url),
        }
    }

    /// Submit an already-built provider payload.
    ///
    /// Mirrors [`Transport::send`] for callers that assemble the request
    /// document themselves; the object is posted to the v3 endpoint.
    /// Fails with [`MailError::InvalidParameter`] when the value is not a
    /// JSON object.
    pub async fn send_raw(&self, payload: serde_json::Value) -> Result<bool, MailError> {
        if !payload.is_object() {
            return Err(
                SendGridError::InvalidPayload("payload must be a JSON object".into()).into(),
            );
        }
        self.post_mail(&self.mail_endpoint(ApiVersion::V3), &payload)
            .await
    }

    /// POST a payload to a mail endpoint and fold the response into the
    /// delivered/not-delivered boolean.
    async fn post_mail(&self, url: &str, body: &serde_json::Value) -> Result<bool, MailError> {
        debug!(url, "submitting mail to SendGrid");

        let mut request = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(body);

        for (name, value) in &self.config.headers {
            request = request.header(name, value);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => {
                warn!(error = %e, "SendGrid unreachable, reporting send failure");
                return Ok(false);
            }
            Err(e) => return Err(SendGridError::Http(e).into()),
        };

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "mail accepted by SendGrid");
            Ok(true)
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "SendGrid rejected mail");
            Ok(false)
        }
    }

    /// Verify the configured API key against the scopes endpoint.
    #[instrument(skip(self), fields(transport = "sendgrid"))]
    pub async fn health_check(&self) -> Result<(), MailError> {
        let url = format!("{}/v3/scopes", self.config.api_base_url);

        debug!("performing SendGrid health check");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(SendGridError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::InvalidResponse(format!("HTTP {status}: {body}")));
        }

        debug!("SendGrid health check passed");
        Ok(())
    }
}

#[async_trait]
impl Transport for SendGridTransport {
    type Message = Message;

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "sendgrid"
    }

    #[instrument(skip(self, message), fields(transport = "sendgrid"))]
    async fn send(&self, message: &Message) -> Result<bool, MailError> {
        let body = message.to_json()?;
        let url = self.mail_endpoint(message.api_version());
        self.post_mail(&url, &body).await
    }
}

#[cfg(test)]
mod tests {
    use outbox_mail::Transport;

    use super::*;

    /// A minimal mock HTTP server built on tokio that accepts one
    /// connection, replies with a canned response, and hands back the raw
    /// request it read.
    struct MockSendGridServer {
        listener: tokio::net::TcpListener,
        base_url: String,
    }

    impl MockSendGridServer {
        async fn start() -> Self {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("failed to bind mock server");
            let port = listener.local_addr().unwrap().port();
            let base_url = format!("http://127.0.0.1:{port}");
            Self { listener, base_url }
        }

        async fn respond_once(self, status_code: u16, body: &str) -> String {
            let body = body.to_owned();
            let (mut stream, _) = self.listener.accept().await.unwrap();

            use tokio::io::{AsyncReadExt, AsyncWriteExt};

            let mut buf = vec![0u8; 16384];
            let n = stream.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).into_owned();

            let response = format!(
                "HTTP/1.1 {status_code} OK\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\
                 \r\n\
                 {body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();

            request
        }
    }

    fn test_config(base_url: &str) -> SendGridConfig {
        SendGridConfig::new("SG.test-key").with_api_base_url(base_url)
    }

    fn test_message() -> Message {
        Message::v3()
            .with_from(("sender@example.com", "Sender"))
            .with_to("user@example.com")
            .with_subject("Hello")
            .with_text_body("Hi there")
    }

    #[test]
    fn new_without_api_key_is_a_configuration_error() {
        let err = SendGridTransport::new(SendGridConfig::new("")).unwrap_err();
        assert!(matches!(err, MailError::Configuration(_)));
    }

    #[test]
    fn transport_name() {
        let transport = SendGridTransport::new(SendGridConfig::new("SG.k")).unwrap();
        assert_eq!(transport.name(), "sendgrid");
    }

    #[test]
    fn compose_follows_the_configured_version() {
        let transport = SendGridTransport::new(
            SendGridConfig::new("SG.k").with_api_version(ApiVersion::Legacy),
        )
        .unwrap();
        assert_eq!(transport.compose().api_version(), ApiVersion::Legacy);

        let transport = SendGridTransport::new(SendGridConfig::new("SG.k")).unwrap();
        assert_eq!(transport.compose().api_version(), ApiVersion::V3);
    }

    #[test]
    fn debug_does_not_leak_the_api_key() {
        let transport = SendGridTransport::new(SendGridConfig::new("SG.super-secret")).unwrap();
        let debug = format!("{transport:?}");
        assert!(!debug.contains("super-secret"));
    }

    #[tokio::test]
    async fn accepted_send_returns_true() {
        let server = MockSendGridServer::start().await;
        let transport = SendGridTransport::new(test_config(&server.base_url)).unwrap();

        let server_handle = tokio::spawn(async move { server.respond_once(202, "").await });

        let delivered = transport.send(&test_message()).await.unwrap();
        let request = server_handle.await.unwrap().to_ascii_lowercase();

        assert!(delivered);
        assert!(request.starts_with("post /v3/mail/send"));
        assert!(request.contains("authorization: bearer sg.test-key"));
    }

    #[tokio::test]
    async fn rejected_send_returns_false() {
        let server = MockSendGridServer::start().await;
        let transport = SendGridTransport::new(test_config(&server.base_url)).unwrap();

        let server_handle = tokio::spawn(async move {
            server
                .respond_once(400, r#"{"errors":[{"message":"bad request"}]}"#)
                .await
        });

        let delivered = transport.send(&test_message()).await.unwrap();
        server_handle.await.unwrap();

        assert!(!delivered);
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_soft_failure() {
        // Nothing listens on this port; the connection is refused.
        let transport = SendGridTransport::new(test_config("http://127.0.0.1:1")).unwrap();

        let delivered = transport.send(&test_message()).await.unwrap();
        assert!(!delivered);
    }

    #[tokio::test]
    async fn legacy_messages_use_the_legacy_endpoint() {
        let server = MockSendGridServer::start().await;
        let config = test_config(&server.base_url).with_api_version(ApiVersion::Legacy);
        let transport = SendGridTransport::new(config).unwrap();

        let message = transport
            .compose()
            .with_from("sender@example.com")
            .with_to("user@example.com")
            .with_subject("Hello")
            .with_text_body("Hi there");

        let server_handle = tokio::spawn(async move { server.respond_once(200, "").await });

        let delivered = transport.send(&message).await.unwrap();
        let request = server_handle.await.unwrap().to_ascii_lowercase();

        assert!(delivered);
        assert!(request.starts_with("post /api/mail.send.json"));
    }

    #[tokio::test]
    async fn send_raw_submits_a_json_object() {
        let server = MockSendGridServer::start().await;
        let transport = SendGridTransport::new(test_config(&server.base_url)).unwrap();

        let server_handle = tokio::spawn(async move { server.respond_once(202, "").await });

        let delivered = transport
            .send_raw(serde_json::json!({"subject": "raw"}))
            .await
            .unwrap();
        let request = server_handle.await.unwrap().to_ascii_lowercase();

        assert!(delivered);
        assert!(request.starts_with("post /v3/mail/send"));
    }

    #[tokio::test]
    async fn send_raw_rejects_non_object_payloads() {
        let transport = SendGridTransport::new(test_config("http://127.0.0.1:1")).unwrap();

        let err = transport
            .send_raw(serde_json::json!(["not", "an", "object"]))
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::InvalidParameter(_)));

        let err = transport
            .send_raw(serde_json::json!("scalar"))
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn extra_headers_are_forwarded() {
        let server = MockSendGridServer::start().await;
        let config = test_config(&server.base_url).with_header("X-Proxy-Tag", "eu-1");
        let transport = SendGridTransport::new(config).unwrap();

        let server_handle = tokio::spawn(async move { server.respond_once(202, "").await });

        transport.send(&test_message()).await.unwrap();
        let request = server_handle.await.unwrap().to_ascii_lowercase();

        assert!(request.contains("x-proxy-tag: eu-1"));
    }

    #[tokio::test]
    async fn health_check_passes_on_success() {
        let server = MockSendGridServer::start().await;
        let transport = SendGridTransport::new(test_config(&server.base_url)).unwrap();

        let server_handle = tokio::spawn(async move {
            server.respond_once(200, r#"{"scopes":["mail.send"]}"#).await
        });

        let result = transport.health_check().await;
        let request = server_handle.await.unwrap().to_ascii_lowercase();

        assert!(result.is_ok());
        assert!(request.starts_with("get /v3/scopes"));
    }

    #[tokio::test]
    async fn health_check_fails_on_unauthorized() {
        let server = MockSendGridServer::start().await;
        let transport = SendGridTransport::new(test_config(&server.base_url)).unwrap();

        let server_handle = tokio::spawn(async move {
            server
                .respond_once(401, r#"{"errors":[{"message":"authorization required"}]}"#)
                .await
        });

        let err = transport.health_check().await.unwrap_err();
        server_handle.await.unwrap();

        assert!(matches!(err, MailError::InvalidResponse(_)));
    }
}
