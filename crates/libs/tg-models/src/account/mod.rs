//! Account records.

use std::collections::HashSet;

use tg_auth::identity::Identity;

use crate::auth::role::Role;

pub mod memory;
pub mod store;

/// Everything the authentication layer knows about an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub identity: Identity,
    /// Argon2 PHC string; never the plaintext password.
    pub password_hash: String,
    pub roles: HashSet<Role>,
    pub enabled: bool,
}

impl AccountRecord {
    pub fn new(identity: Identity, password_hash: String, roles: HashSet<Role>) -> Self {
        Self {
            identity,
            password_hash,
            roles,
            enabled: true,
        }
    }

    /// An enabled account holding only [`Role::user`].
    pub fn new_user(identity: Identity, password_hash: String) -> Self {
        Self::new(identity, password_hash, HashSet::from([Role::user()]))
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.id == role)
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }
}
