//! Token payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Claim names owned by the issuer. Extra claims may not use them.
pub const REGISTERED_CLAIMS: [&str; 7] = ["sub", "iss", "iat", "exp", "nbf", "aud", "jti"];

/// Claims carried by every token.
///
/// Only `exp` is required to decode; a token without `sub` decodes but is
/// refused by [`crate::verifier::TokenVerifier::verify`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity the token was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issuer.
    #[serde(default)]
    pub iss: String,
    /// Issued at (unix seconds).
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (unix seconds).
    pub exp: i64,
    /// Token ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<Uuid>,
    /// Any additional, application defined claims.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
