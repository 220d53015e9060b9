use std::fmt;

use serde::{Deserialize, Serialize};

/// An email address with an optional display name.
///
/// Call sites normally go through the `From` conversions, which accept a
/// bare address or an (address, display name) pair. Transport setters take
/// `impl Into<Address>`, so a recipient list may mix both forms:
///
/// ```
/// use outbox_mail::Address;
///
/// let plain = Address::from("alice@example.com");
/// assert!(plain.name.is_none());
///
/// let named = Address::from(("alice@example.com", "Alice"));
/// assert_eq!(named.name.as_deref(), Some("Alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// The bare email address.
    pub email: String,

    /// Optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Address {
    /// Create an address without a display name.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Create an address with a display name.
    pub fn named(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }
}

impl From<&str> for Address {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

impl From<String> for Address {
    fn from(email: String) -> Self {
        Self::new(email)
    }
}

impl<E: Into<String>, N: Into<String>> From<(E, N)> for Address {
    fn from((email, name): (E, N)) -> Self {
        Self::named(email, name)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.email),
            None => f.write_str(&self.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bare_str() {
        let addr = Address::from("user@example.com");
        assert_eq!(addr.email, "user@example.com");
        assert!(addr.name.is_none());
    }

    #[test]
    fn from_owned_string() {
        let addr = Address::from("user@example.com".to_owned());
        assert_eq!(addr.email, "user@example.com");
        assert!(addr.name.is_none());
    }

    #[test]
    fn from_pair_carries_display_name() {
        let addr = Address::from(("user@example.com", "User"));
        assert_eq!(addr.email, "user@example.com");
        assert_eq!(addr.name.as_deref(), Some("User"));
    }

    #[test]
    fn display_without_name() {
        let addr = Address::new("user@example.com");
        assert_eq!(addr.to_string(), "user@example.com");
    }

    #[test]
    fn display_with_name() {
        let addr = Address::named("user@example.com", "User");
        assert_eq!(addr.to_string(), "User <user@example.com>");
    }

    #[test]
    fn serialize_skips_missing_name() {
        let json = serde_json::to_value(Address::new("user@example.com")).unwrap();
        assert_eq!(json["email"], "user@example.com");
        assert!(json.get("name").is_none());
    }
}
