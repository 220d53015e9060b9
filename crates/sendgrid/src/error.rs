use outbox_mail::MailError;
use thiserror::Error;

/// Errors specific to the SendGrid transport.
///
/// These are internal errors that get converted into [`MailError`] at the
/// public API boundary.
#[derive(Debug, Error)]
pub enum SendGridError {
    /// An HTTP-level transport error occurred.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No API key was configured.
    #[error("missing SendGrid API key")]
    MissingApiKey,

    /// A raw payload had the wrong shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<SendGridError> for MailError {
    fn from(err: SendGridError) -> Self {
        match err {
            SendGridError::Http(e) => MailError::InvalidResponse(e.to_string()),
            SendGridError::MissingApiKey => {
                MailError::Configuration("SendGrid API key is not set".into())
            }
            SendGridError::InvalidPayload(msg) => MailError::InvalidParameter(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_maps_to_configuration() {
        let mail_err: MailError = SendGridError::MissingApiKey.into();
        assert!(matches!(mail_err, MailError::Configuration(_)));
    }

    #[test]
    fn invalid_payload_maps_to_invalid_parameter() {
        let mail_err: MailError =
            SendGridError::InvalidPayload("payload must be a JSON object".into()).into();
        assert!(matches!(mail_err, MailError::InvalidParameter(_)));
    }

    #[test]
    fn error_display() {
        let err = SendGridError::InvalidPayload("not an object".into());
        assert_eq!(err.to_string(), "invalid payload: not an object");
    }
}
