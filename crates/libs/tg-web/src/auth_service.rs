//! Account signup, credential checks and token issuance.

use std::{collections::HashSet, sync::Arc};

use tg_auth::{
    clock::Clock,
    identity::Identity,
    issuer::TokenIssuer,
    secret_hash::{generate_secret_hash, is_secret_valid},
};
use tg_models::{
    account::{AccountRecord, store::AccountStore},
    auth::role::Role,
};
use tracing::{info, warn};

use crate::{
    account_api::{AuthResponse, LoginRequest, SignupRequest, UserResponse},
    prelude::*,
};

/// Shortest accepted signup password, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;
/// Longest accepted signup password, in characters.
pub const MAX_PASSWORD_LEN: usize = 64;

/// Everything the account endpoints need, bundled for handler state.
#[derive(Clone)]
pub struct AuthService {
    issuer: TokenIssuer,
    accounts: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    pub fn new(
        issuer: TokenIssuer,
        accounts: Arc<dyn AccountStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            issuer,
            accounts,
            clock,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn accounts(&self) -> &Arc<dyn AccountStore> {
        &self.accounts
    }

    /// Creates a `USER` account and logs it in.
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        let identity = validate_signup(request)?;
        let account = self
            .register(identity, &request.password, HashSet::from([Role::user()]))
            .await?;
        info!("New signup {}", account.identity);
        self.issue_for(&account)
    }

    /// Stores a new enabled account with the given roles.
    ///
    /// No password policy is applied here; [`AuthService::signup`] does that
    /// for self-service accounts.
    pub async fn register(
        &self,
        identity: Identity,
        password: &str,
        roles: HashSet<Role>,
    ) -> Result<AccountRecord> {
        if self.accounts.exists(&identity).await? {
            return Err(Error::IdentityTaken);
        }

        let password = String::from(password);
        let password_hash =
            tokio::task::spawn_blocking(move || generate_secret_hash(&password)).await??;

        let account = AccountRecord::new(identity, password_hash, roles);
        self.accounts
            .insert(account.clone())
            .await
            .map_err(|err| match err {
                tg_models::error::Error::DuplicateIdentity(_) => Error::IdentityTaken,
                err => Error::Models(err),
            })?;
        Ok(account)
    }

    /// Checks an identity/password pair against the account store.
    ///
    /// Unknown identities and wrong passwords both fail with
    /// [`Error::WrongCredentials`].
    pub async fn authenticate_credentials(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<AccountRecord> {
        if password.is_empty() {
            return Err(Error::MissingCredentials);
        }
        let identity = Identity::new(identity).map_err(|_| Error::MissingCredentials)?;

        let Some(account) = self.accounts.find(&identity).await? else {
            warn!("Login attempt for unknown account {identity}");
            return Err(Error::WrongCredentials);
        };

        let password = String::from(password);
        let hash = account.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || is_secret_valid(&password, &hash)).await??;
        if !is_valid {
            warn!("Wrong password for {identity}");
            return Err(Error::WrongCredentials);
        }

        if !account.enabled {
            warn!("Login attempt for disabled account {identity}");
            return Err(Error::AccountDisabled);
        }

        Ok(account)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        let account = self
            .authenticate_credentials(&request.email, &request.password)
            .await?;
        info!("Login {}", account.identity);
        self.issue_for(&account)
    }

    /// Whether an account is already registered under `identity`.
    ///
    /// Blank input is never taken.
    pub async fn is_identity_taken(&self, identity: &str) -> Result<bool> {
        match Identity::new(identity) {
            Ok(identity) => Ok(self.accounts.exists(&identity).await?),
            Err(_) => Ok(false),
        }
    }

    /// Issues a token for an already authenticated account.
    pub fn issue_for(&self, account: &AccountRecord) -> Result<AuthResponse> {
        let issued = self.issuer.issue(&account.identity, self.clock.now())?;
        Ok(AuthResponse {
            token: issued.into_auth_body(),
            user: UserResponse::from(account),
        })
    }
}

fn validate_signup(request: &SignupRequest) -> Result<Identity> {
    if !request.email.contains('@') {
        return Err(Error::InvalidRequest(String::from(
            "Email must be a valid address",
        )));
    }
    let identity = Identity::new(request.email.as_str())
        .map_err(|_| Error::InvalidRequest(String::from("Email must not be blank")))?;

    let len = request.password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(Error::InvalidRequest(format!(
            "Password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(identity)
}
