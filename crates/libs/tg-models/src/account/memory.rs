//! In-memory account store.
//!
//! Suitable for tests, demos and single-process deployments. Data is lost
//! when the process exits.

use std::collections::HashMap;

use async_trait::async_trait;
use tg_auth::identity::Identity;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    account::{AccountRecord, store::AccountStore},
    prelude::*,
};

#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<Identity, AccountRecord>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find(&self, identity: &Identity) -> Result<Option<AccountRecord>> {
        Ok(self.accounts.read().await.get(identity).cloned())
    }

    async fn insert(&self, account: AccountRecord) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.identity) {
            return Err(Error::DuplicateIdentity(account.identity));
        }
        debug!("Registered account {}", account.identity);
        accounts.insert(account.identity.clone(), account);
        Ok(())
    }

    async fn update(&self, account: AccountRecord) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&account.identity) {
            Some(existing) => {
                *existing = account;
                Ok(())
            }
            None => Err(Error::NotFound(account.identity)),
        }
    }
}
