//! Token issuance and verification core for tokengate.
//!
//! The crate is split the way a request flows through it:
//!
//! - [`signing_key`]: resolve the process-wide HMAC key from configuration
//! - [`issuer`]: build signed tokens for an [`identity::Identity`]
//! - [`verifier`]: parse, authenticate and expiry-check presented tokens
//! - [`secret_hash`]: the one-way password hash used by credential checks
//!
//! Time is always passed in explicitly (see [`clock`]) so that every
//! expiry decision can be reproduced in tests.

pub mod auth_body;
pub mod claims;
pub mod clock;
pub mod error;
pub mod identity;
pub mod issuer;
pub mod prelude;
pub mod secret_hash;
pub mod signing_key;
pub mod verifier;

/// Token type reported to clients alongside the access token.
pub const CONNECTION_TOKEN_TYPE: &str = "Bearer";
/// Request header carrying the credential.
pub const AUTH_HEADER: &str = "Authorization";
/// Scheme prefix recognised in [`AUTH_HEADER`]. Case-sensitive, one space.
pub const AUTH_HEADER_PREFIX: &str = "Bearer ";
/// Issuer claim stamped on every token.
pub const ISS: &str = "tokengate";
