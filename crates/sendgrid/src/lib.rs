//! SendGrid transport for Outbox.
//!
//! This crate implements the [`Transport`](outbox_mail::Transport) trait
//! against the SendGrid HTTP API. Messages are assembled with the fluent
//! [`Message`] builder and dispatched through a [`SendGridTransport`],
//! which reports delivery as a boolean: `true` when SendGrid accepted the
//! mail, `false` when it rejected it or was unreachable.
//!
//! Two request schemas are supported, selected by
//! [`ApiVersion`] in the configuration: the current v3 `mail/send` schema
//! and the pre-v3 schema kept for installations still pinned to it.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use outbox_mail::Transport;
//! use outbox_sendgrid::{SendGridConfig, SendGridTransport};
//!
//! # async fn run() -> Result<(), outbox_mail::MailError> {
//! let config = SendGridConfig::new("SG.your-api-key");
//! let transport = SendGridTransport::new(config)?;
//!
//! let message = transport
//!     .compose()
//!     .with_from(("noreply@example.com", "Example"))
//!     .with_to("user@example.com")
//!     .with_subject("Welcome")
//!     .with_text_body("Hello!");
//!
//! let delivered = transport.send(&message).await?;
//! # let _ = delivered;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod legacy;
pub mod message;
pub mod transport;
pub mod v3;

pub use config::SendGridConfig;
pub use error::SendGridError;
pub use message::{ApiVersion, Message, Payload, SubstitutionValue};
pub use transport::SendGridTransport;
