//! The account store abstraction.

use std::collections::HashSet;

use async_trait::async_trait;
use tg_auth::identity::Identity;

use crate::{account::AccountRecord, auth::role::Role, prelude::*};

/// System of record for accounts.
///
/// Implementations may block on I/O; callers await them once per request
/// and never cache the answer across requests.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Looks up an account by identity.
    async fn find(&self, identity: &Identity) -> Result<Option<AccountRecord>>;

    /// Stores a new account. Fails with [`Error::DuplicateIdentity`] if the
    /// identity is taken.
    async fn insert(&self, account: AccountRecord) -> Result<()>;

    /// Replaces an existing account. Fails with [`Error::NotFound`] if
    /// there is none.
    async fn update(&self, account: AccountRecord) -> Result<()>;

    async fn exists(&self, identity: &Identity) -> Result<bool> {
        Ok(self.find(identity).await?.is_some())
    }

    /// Current roles of an enabled account.
    ///
    /// Fails with [`Error::NotFound`] for unknown identities and with
    /// [`Error::Disabled`] for disabled accounts.
    async fn load_roles(&self, identity: &Identity) -> Result<HashSet<Role>> {
        let account = self
            .find(identity)
            .await?
            .ok_or_else(|| Error::NotFound(identity.clone()))?;
        if !account.enabled {
            return Err(Error::Disabled(identity.clone()));
        }
        Ok(account.roles)
    }
}
