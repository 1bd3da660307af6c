//! Per-request authentication context.
//!
//! The gate stores exactly one [`GateOutcome`] in the request extensions.
//! It lives and dies with that request; nothing is shared between
//! requests or threads.

use std::collections::HashSet;

use tg_auth::{error::VerificationError, identity::Identity};
use tg_models::auth::role::Role;

pub mod resolver;

/// An authenticated identity together with the roles it holds right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub identity: Identity,
    /// Roles as loaded from the account store for this request.
    pub roles: HashSet<Role>,
}

impl Principal {
    /// Creates a new principal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::HashSet;
    /// use tg_auth::identity::Identity;
    /// use tg_models::auth::role::Role;
    /// use tg_web::ctx::Principal;
    ///
    /// let identity = Identity::new("user@example.com").unwrap();
    /// let principal = Principal::new(identity, HashSet::from([Role::user()]));
    /// assert!(principal.has_role(Role::USER));
    /// assert!(!principal.has_role(Role::ADMIN));
    /// ```
    pub fn new(identity: Identity, roles: HashSet<Role>) -> Self {
        Self { identity, roles }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.id == role)
    }

    /// Role names in a stable order.
    pub fn role_names(&self) -> Vec<String> {
        let mut roles: Vec<String> = self.roles.iter().map(|r| r.id.clone()).collect();
        roles.sort();
        roles
    }
}

/// Why a presented token did not authenticate the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateRejection {
    /// The token itself failed verification.
    Token(VerificationError),
    /// The token is valid but names no known account.
    UnknownAccount,
    /// The token is valid but the account is disabled.
    AccountDisabled,
    /// The account store could not be consulted.
    AccountLookup,
}

/// Result of running the authentication gate on one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// No bearer credential was presented.
    NoToken,
    /// A credential was presented and refused.
    Rejected(GateRejection),
    /// The request carries a valid credential for an enabled account.
    Authenticated(Principal),
}

impl GateOutcome {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            GateOutcome::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, GateOutcome::Authenticated(_))
    }
}
