//! Token subject.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// The subject of a token: an account's unique login name (an email in
/// practice).
///
/// Never empty. Construct through [`Identity::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Validates and wraps an identity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tg_auth::identity::Identity;
    ///
    /// let identity = Identity::new("user@example.com").unwrap();
    /// assert_eq!(identity.as_str(), "user@example.com");
    /// assert!(Identity::new("   ").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(Error::InvalidIdentity);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_identities() {
        assert!(matches!(Identity::new(""), Err(Error::InvalidIdentity)));
        assert!(matches!(Identity::new(" \t"), Err(Error::InvalidIdentity)));
    }

    #[test]
    fn keeps_value_verbatim() {
        let identity = Identity::new("Alice@Example.com").unwrap();
        assert_eq!(identity.to_string(), "Alice@Example.com");
    }

    #[test]
    fn deserialization_validates() {
        let ok: Identity = serde_json::from_str("\"bob@x.com\"").unwrap();
        assert_eq!(ok.as_str(), "bob@x.com");
        assert!(serde_json::from_str::<Identity>("\"\"").is_err());
    }
}
