//! Authentication error types.

use crate::signing_key::HmacAlgorithm;

/// Reasons a presented token is refused.
///
/// These are routine outcomes of handling untrusted input. Callers are
/// expected to turn them into an "unauthenticated" decision, never into a
/// crash or a server error.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Malformed token")]
    Malformed,
    #[error("Bad token signature")]
    BadSignature,
    #[error("Token expired")]
    Expired,
    #[error("Token has no subject")]
    MissingSubject,
    #[error("Token subject does not match the expected identity")]
    IdentityMismatch,
}

impl VerificationError {
    /// Stable machine-readable code, suitable for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::Malformed => "malformed_token",
            VerificationError::BadSignature => "bad_signature",
            VerificationError::Expired => "token_expired",
            VerificationError::MissingSubject => "missing_subject",
            VerificationError::IdentityMismatch => "identity_mismatch",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid identity")]
    InvalidIdentity,

    #[error("Configured {algorithm} secret is {actual} bytes, at least {required} are required")]
    WeakConfiguredKey {
        algorithm: HmacAlgorithm,
        actual: usize,
        required: usize,
    },

    #[error("Token expiry is out of range")]
    ExpiryOverflow,

    #[error(transparent)]
    TokenCreation(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("Error hashing password {0}")]
    PasswordHash(argon2::password_hash::Error),
}
