//! Token issuance.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Header, encode};
use serde_json::{Map, Value};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::{
    ISS,
    auth_body::AuthBody,
    claims::{Claims, REGISTERED_CLAIMS},
    identity::Identity,
    prelude::*,
    signing_key::SigningKey,
};

/// A freshly signed token together with its validity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Seconds between issuance and expiry.
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - self.issued_at).num_seconds()
    }

    pub fn into_auth_body(self) -> AuthBody {
        let expires_in = self.expires_in();
        AuthBody::new(self.token, expires_in)
    }
}

/// Signs tokens for authenticated identities.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use chrono::{DateTime, TimeDelta};
/// use tg_auth::{
///     identity::Identity,
///     issuer::TokenIssuer,
///     signing_key::{HmacAlgorithm, SigningKey},
///     verifier::TokenVerifier,
/// };
///
/// let key = Arc::new(SigningKey::generate(HmacAlgorithm::HS256));
/// let issuer = TokenIssuer::new(key.clone(), TimeDelta::hours(1));
/// let verifier = TokenVerifier::new(key);
///
/// let now = DateTime::from_timestamp(1_000, 0).unwrap();
/// let alice = Identity::new("alice@example.com").unwrap();
/// let issued = issuer.issue(&alice, now).unwrap();
///
/// assert_eq!(verifier.verify(&issued.token, now).unwrap(), alice);
/// ```
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: Arc<SigningKey>,
    validity: TimeDelta,
}

impl TokenIssuer {
    pub fn new(key: Arc<SigningKey>, validity: TimeDelta) -> Self {
        Self { key, validity }
    }

    /// How long issued tokens stay valid.
    pub fn validity(&self) -> TimeDelta {
        self.validity
    }

    /// Issues a token for `identity`, valid from `now` for the configured
    /// duration.
    pub fn issue(&self, identity: &Identity, now: DateTime<Utc>) -> Result<IssuedToken> {
        self.issue_with_claims(identity, now, Map::new())
    }

    /// Like [`TokenIssuer::issue`] but takes the identity as a raw string.
    ///
    /// Fails with [`Error::InvalidIdentity`] for blank input.
    pub fn issue_for(&self, identity: &str, now: DateTime<Utc>) -> Result<IssuedToken> {
        let identity = Identity::new(identity)?;
        self.issue(&identity, now)
    }

    /// Issues a token carrying additional claims.
    ///
    /// Extra claims named like a registered claim (`sub`, `exp`, ...) are
    /// dropped.
    pub fn issue_with_claims(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
        mut extra: Map<String, Value>,
    ) -> Result<IssuedToken> {
        let expires_at = now
            .checked_add_signed(self.validity)
            .ok_or(Error::ExpiryOverflow)?;

        for name in REGISTERED_CLAIMS {
            if extra.remove(name).is_some() {
                warn!("Dropping extra claim '{name}' that shadows a registered claim");
            }
        }

        let claims = Claims {
            sub: Some(identity.to_string()),
            iss: String::from(ISS),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Some(Uuid::new_v4()),
            extra,
        };

        let header = Header::new(self.key.algorithm().jwt_algorithm());
        let token = encode(&header, &claims, self.key.encoding()).map_err(|err| {
            error!("Failed to encode JWT {err}");
            err
        })?;

        debug!("Issued token for {identity}, expires at {expires_at}");
        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at,
        })
    }
}
