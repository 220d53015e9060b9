use thiserror::Error;

/// Error taxonomy shared by all Outbox transports.
///
/// A failed delivery is not an error: [`Transport::send`](crate::Transport::send)
/// reports it as `Ok(false)`. These variants cover misuse and unusable
/// provider responses.
#[derive(Debug, Error)]
pub enum MailError {
    /// The transport is misconfigured (e.g. a missing API key).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A send was invoked with an argument the transport cannot accept.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The provider produced a response that cannot be interpreted.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// A message payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The operation is not supported by the selected provider schema.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}
