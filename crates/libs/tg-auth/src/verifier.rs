//! Token verification.
//!
//! Verification runs in a fixed order and stops at the first failure:
//!
//! 1. structural parse (`Malformed`)
//! 2. signature, compared in constant time (`BadSignature`)
//! 3. expiry against the caller's `now` (`Expired`, also when `now == exp`)
//! 4. subject extraction (`MissingSubject`)
//!
//! Every failure is a [`VerificationError`]; no input string makes the
//! verifier panic.

use std::{collections::HashSet, sync::Arc};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Validation, decode, decode_header, errors::ErrorKind};
use tracing::debug;

use crate::{
    claims::Claims, error::VerificationError, identity::Identity, signing_key::SigningKey,
};

type VerifyResult<T> = core::result::Result<T, VerificationError>;

/// Checks tokens produced by a [`crate::issuer::TokenIssuer`] sharing the
/// same [`SigningKey`].
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    key: Arc<SigningKey>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(key: Arc<SigningKey>) -> Self {
        let mut validation = Validation::new(key.algorithm().jwt_algorithm());
        // Expiry is judged against the injected clock below, not the
        // library's wall clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::new();
        Self { key, validation }
    }

    /// Runs steps 1 to 3 and returns the decoded claims.
    ///
    /// The subject is not checked; use [`TokenVerifier::verify`] for that.
    pub fn verify_claims(&self, token: &str, now: DateTime<Utc>) -> VerifyResult<Claims> {
        check_structure(token)?;

        let claims = decode::<Claims>(token, self.key.decoding(), &self.validation)
            .map_err(|err| {
                let reason = classify(err.kind());
                debug!("Rejecting token: {err}");
                reason
            })?
            .claims;

        if now.timestamp() >= claims.exp {
            debug!("Rejecting token: expired at {}", claims.exp);
            return Err(VerificationError::Expired);
        }
        Ok(claims)
    }

    /// Verifies `token` and returns the identity it was issued to.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> VerifyResult<Identity> {
        self.verify_claims(token, now)?
            .sub
            .and_then(|sub| Identity::new(sub).ok())
            .ok_or(VerificationError::MissingSubject)
    }

    /// Verifies `token` and additionally requires it to belong to
    /// `expected`.
    ///
    /// Guards against a valid token for one account being replayed in
    /// another account's context.
    pub fn validate_against(
        &self,
        token: &str,
        expected: &Identity,
        now: DateTime<Utc>,
    ) -> VerifyResult<Identity> {
        let identity = self.verify(token, now)?;
        if &identity != expected {
            debug!("Rejecting token: issued to {identity}, expected {expected}");
            return Err(VerificationError::IdentityMismatch);
        }
        Ok(identity)
    }
}

/// Step 1: three segments, a decodable header and a JSON claims payload.
///
/// `jsonwebtoken::decode` checks the signature before it looks at the
/// payload, so a broken payload must be caught here to report `Malformed`.
fn check_structure(token: &str) -> VerifyResult<()> {
    let mut segments = token.split('.');
    let (Some(_), Some(payload), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        debug!("Rejecting token: not three segments");
        return Err(VerificationError::Malformed);
    };

    decode_header(token).map_err(|err| {
        debug!("Rejecting token: bad header: {err}");
        VerificationError::Malformed
    })?;

    let payload = URL_SAFE_NO_PAD.decode(payload).map_err(|err| {
        debug!("Rejecting token: payload is not base64url: {err}");
        VerificationError::Malformed
    })?;
    serde_json::from_slice::<Claims>(&payload).map_err(|err| {
        debug!("Rejecting token: payload is not a claims object: {err}");
        VerificationError::Malformed
    })?;
    Ok(())
}

fn classify(kind: &ErrorKind) -> VerificationError {
    match kind {
        // A header naming another algorithm than ours is a key mismatch.
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            VerificationError::BadSignature
        }
        _ => VerificationError::Malformed,
    }
}
