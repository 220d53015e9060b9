//! Mail contract shared by Outbox transports.
//!
//! This crate defines the vocabulary an application uses to describe
//! outgoing mail ([`Address`], [`Attachment`]), the shared error taxonomy
//! ([`MailError`]), and the [`Transport`] trait a delivery backend
//! implements.
//!
//! # Quick start
//!
//! ```
//! use outbox_mail::Address;
//!
//! let plain = Address::from("alice@example.com");
//! let named = Address::from(("bob@example.com", "Bob"));
//! assert!(plain.name.is_none());
//! assert_eq!(named.name.as_deref(), Some("Bob"));
//! ```

pub mod address;
pub mod attachment;
pub mod error;
pub mod transport;

pub use address::Address;
pub use attachment::Attachment;
pub use error::MailError;
pub use transport::Transport;
