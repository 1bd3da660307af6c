//! Account store error types.

use tg_auth::identity::Identity;

/// Account store errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No account is registered under the identity.
    #[error("Account '{0}' not found")]
    NotFound(Identity),

    /// The account exists but may not authenticate.
    #[error("Account '{0}' is disabled")]
    Disabled(Identity),

    /// An account is already registered under the identity.
    #[error("Account '{0}' already exists")]
    DuplicateIdentity(Identity),

    /// The backing store could not be reached.
    #[error("Account store unavailable: {0}")]
    Unavailable(String),
}
