use async_trait::async_trait;

use crate::error::MailError;

/// Trait for mail delivery backends.
///
/// `send` resolves to `Ok(true)` when the provider accepted the message and
/// `Ok(false)` when it rejected the message or could not be reached at all.
/// Errors are reserved for misuse (bad parameters, missing configuration)
/// and responses the transport cannot interpret.
#[async_trait]
pub trait Transport: Send + Sync {
    /// The message type this transport delivers.
    type Message;

    /// Deliver a single message.
    async fn send(&self, message: &Self::Message) -> Result<bool, MailError>;

    /// Transport name for logging and diagnostics.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingTransport {
        accept: bool,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        type Message = String;

        async fn send(&self, _message: &String) -> Result<bool, MailError> {
            Ok(self.accept)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn send_reports_the_provider_outcome() {
        let accepting = RecordingTransport { accept: true };
        let rejecting = RecordingTransport { accept: false };

        assert!(accepting.send(&"hello".to_owned()).await.unwrap());
        assert!(!rejecting.send(&"hello".to_owned()).await.unwrap());
        assert_eq!(accepting.name(), "recording");
    }
}
