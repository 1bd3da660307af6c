//! Shared application state.

use std::{collections::HashSet, sync::Arc};

use chrono::TimeDelta;
use tg_auth::{
    clock::{Clock, SystemClock},
    identity::Identity,
    issuer::TokenIssuer,
    signing_key::SigningKey,
    verifier::TokenVerifier,
};
use tg_config::tg_config::{SeedAccount, TgConfig};
use tg_models::{
    account::{memory::MemoryAccountStore, store::AccountStore},
    auth::role::Role,
};
use tg_web::{auth_service::AuthService, ctx::resolver::AuthGate};
use tracing::{info, warn};

use crate::prelude::*;

/// Everything the handlers and the gate middleware share.
///
/// All members are cheap to clone; the signing key is loaded once and
/// never changes for the lifetime of the process.
#[derive(Clone)]
pub struct TgState {
    pub gate: Arc<AuthGate>,
    pub issuer: TokenIssuer,
    pub accounts: Arc<dyn AccountStore>,
    pub clock: Arc<dyn Clock>,
    pub auth: AuthService,
}

impl TgState {
    pub fn new(
        key: Arc<SigningKey>,
        validity: TimeDelta,
        accounts: Arc<dyn AccountStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let issuer = TokenIssuer::new(key.clone(), validity);
        let gate = Arc::new(AuthGate::new(
            TokenVerifier::new(key),
            accounts.clone(),
            clock.clone(),
        ));
        let auth = AuthService::new(issuer.clone(), accounts.clone(), clock.clone());
        Self {
            gate,
            issuer,
            accounts,
            clock,
            auth,
        }
    }

    /// Builds the state from configuration with an in-memory account store
    /// and the system clock, then registers the configured seed accounts.
    ///
    /// Fails before anything is served if the configured secret is too
    /// short for the algorithm and key generation was not allowed, or if the
    /// token lifetime is zero or too large to compute an expiry.
    pub async fn from_config(config: &TgConfig) -> Result<Self> {
        let validity = config.auth.validity()?;
        let key = Arc::new(config.auth.signing_key()?);
        info!(
            "Signing tokens with {} ({} byte key{})",
            key.algorithm(),
            key.len(),
            if key.is_generated() { ", generated" } else { "" }
        );

        let state = Self::new(
            key,
            validity,
            Arc::new(MemoryAccountStore::new()),
            Arc::new(SystemClock),
        );
        state.seed(&config.accounts).await?;
        Ok(state)
    }

    /// Registers seed accounts. Identities that already exist are skipped.
    pub async fn seed(&self, accounts: &[SeedAccount]) -> Result<()> {
        for seed in accounts {
            let identity = Identity::new(seed.identity.as_str())?;
            let roles: HashSet<Role> = seed.roles.iter().map(|r| Role::from(r.as_str())).collect();
            match self.auth.register(identity, &seed.password, roles).await {
                Ok(account) => info!("Seeded account {}", account.identity),
                Err(tg_web::error::Error::IdentityTaken) => {
                    warn!("Seed account {} already exists", seed.identity)
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}
