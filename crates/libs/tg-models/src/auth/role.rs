//! Role model for authorization.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A role granted to an account, such as `USER` or `ADMIN`.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role {
    /// The unique role identifier.
    pub id: String,
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self {
            id: String::from(value),
        }
    }
}

impl Role {
    pub const USER: &'static str = "USER";
    pub const ADMIN: &'static str = "ADMIN";

    /// Creates a new role with the given ID.
    pub const fn new(id: String) -> Self {
        Role { id }
    }

    /// The role every signed up account starts with.
    pub fn user() -> Self {
        Self::from(Self::USER)
    }

    pub fn admin() -> Self {
        Self::from(Self::ADMIN)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}
