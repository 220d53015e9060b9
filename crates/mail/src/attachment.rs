use std::fmt;

/// A raw-content attachment.
///
/// Carries the bytes themselves; transports encode them however their wire
/// format requires. For inline use (an image referenced from an HTML body)
/// set a content id with [`Attachment::with_content_id`].
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Filename shown to the recipient.
    pub filename: String,

    /// The attachment bytes.
    pub content: Vec<u8>,

    /// Optional MIME type (e.g. `application/pdf`).
    pub content_type: Option<String>,

    /// Optional content id for inline references.
    pub content_id: Option<String>,
}

impl Attachment {
    /// Create an attachment from a filename and its content bytes.
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            content_type: None,
            content_id: None,
        }
    }

    /// Set the MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the content id used to reference this attachment inline.
    #[must_use]
    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("content", &format_args!("{} bytes", self.content.len()))
            .field("content_type", &self.content_type)
            .field("content_id", &self.content_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sets_filename_and_bytes() {
        let att = Attachment::new("report.pdf", b"%PDF".to_vec());
        assert_eq!(att.filename, "report.pdf");
        assert_eq!(att.content, b"%PDF");
        assert!(att.content_type.is_none());
        assert!(att.content_id.is_none());
    }

    #[test]
    fn builder_sets_metadata() {
        let att = Attachment::new("logo.png", vec![1, 2, 3])
            .with_content_type("image/png")
            .with_content_id("logo");
        assert_eq!(att.content_type.as_deref(), Some("image/png"));
        assert_eq!(att.content_id.as_deref(), Some("logo"));
    }

    #[test]
    fn debug_shows_length_not_bytes() {
        let att = Attachment::new("blob.bin", vec![0u8; 42]);
        let debug = format!("{att:?}");
        assert!(debug.contains("42 bytes"));
        assert!(!debug.contains("[0"));
    }
}
