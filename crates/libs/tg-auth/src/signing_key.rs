//! Signing key resolution.
//!
//! Tokens are signed with a symmetric HMAC key derived from the configured
//! secret. The key is built once at startup, wrapped in an `Arc` and only
//! read afterwards, so any number of request tasks may share it.
//!
//! A secret shorter than the algorithm's minimum is refused with
//! [`Error::WeakConfiguredKey`]. Generating a random key instead is only
//! done when explicitly asked for with [`KeyPolicy::GenerateIfWeak`]:
//! such a key lives only as long as the process, so every token it signed
//! becomes unverifiable after a restart or on another replica.

use std::{fmt::Display, str::FromStr};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::prelude::*;

/// HMAC flavour used for every token of a deployment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HmacAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

impl HmacAlgorithm {
    /// Minimum key length in bytes: the digest size of the hash function.
    pub const fn min_key_len(&self) -> usize {
        match self {
            HmacAlgorithm::HS256 => 32,
            HmacAlgorithm::HS384 => 48,
            HmacAlgorithm::HS512 => 64,
        }
    }

    pub const fn jwt_algorithm(&self) -> Algorithm {
        match self {
            HmacAlgorithm::HS256 => Algorithm::HS256,
            HmacAlgorithm::HS384 => Algorithm::HS384,
            HmacAlgorithm::HS512 => Algorithm::HS512,
        }
    }
}

impl Display for HmacAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HmacAlgorithm::HS256 => "HS256",
            HmacAlgorithm::HS384 => "HS384",
            HmacAlgorithm::HS512 => "HS512",
        };
        f.write_str(name)
    }
}

/// Returned when parsing an unknown algorithm name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unsupported HMAC algorithm '{0}'")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for HmacAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "HS256" => Ok(HmacAlgorithm::HS256),
            "HS384" => Ok(HmacAlgorithm::HS384),
            "HS512" => Ok(HmacAlgorithm::HS512),
            other => Err(UnknownAlgorithm(other.to_string())),
        }
    }
}

/// What to do when the configured secret is too short.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Refuse to start.
    #[default]
    Strict,
    /// Substitute a random key. Development only.
    GenerateIfWeak,
}

/// Process-wide HMAC key with its precomputed `jsonwebtoken` key pair.
pub struct SigningKey {
    algorithm: HmacAlgorithm,
    len: usize,
    generated: bool,
    /// Key used for signing new tokens.
    encoding: EncodingKey,
    /// Key used for verifying presented tokens.
    decoding: DecodingKey,
}

impl SigningKey {
    /// Resolves the signing key for `algorithm` from a configured secret.
    ///
    /// The same secret always yields the same key, so tokens stay valid
    /// across restarts and replicas.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tg_auth::signing_key::{HmacAlgorithm, KeyPolicy, SigningKey};
    ///
    /// let secret = b"0123456789abcdef0123456789abcdef";
    /// let key = SigningKey::from_secret(secret, HmacAlgorithm::HS256, KeyPolicy::Strict).unwrap();
    /// assert_eq!(key.len(), 32);
    ///
    /// let weak = SigningKey::from_secret(b"short", HmacAlgorithm::HS256, KeyPolicy::Strict);
    /// assert!(weak.is_err());
    /// ```
    pub fn from_secret(secret: &[u8], algorithm: HmacAlgorithm, policy: KeyPolicy) -> Result<Self> {
        let required = algorithm.min_key_len();
        if secret.len() >= required {
            return Ok(Self::from_bytes(secret, algorithm, false));
        }

        match policy {
            KeyPolicy::Strict => Err(Error::WeakConfiguredKey {
                algorithm,
                actual: secret.len(),
                required,
            }),
            KeyPolicy::GenerateIfWeak => {
                warn!(
                    "Configured {algorithm} secret is {} bytes (< {required}); using a random key. \
                     Tokens will not survive a restart",
                    secret.len()
                );
                Ok(Self::generate(algorithm))
            }
        }
    }

    /// Generates a random key of exactly the minimum length for `algorithm`.
    pub fn generate(algorithm: HmacAlgorithm) -> Self {
        let mut bytes = vec![0u8; algorithm.min_key_len()];
        OsRng.fill_bytes(&mut bytes);
        Self::from_bytes(&bytes, algorithm, true)
    }

    fn from_bytes(bytes: &[u8], algorithm: HmacAlgorithm, generated: bool) -> Self {
        Self {
            algorithm,
            len: bytes.len(),
            generated,
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    pub fn algorithm(&self) -> HmacAlgorithm {
        self.algorithm
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the key was randomly generated rather than derived from
    /// configuration.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub(crate) fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .field("len", &self.len)
            .field("generated", &self.generated)
            .field("key", &"REDACTED")
            .finish()
    }
}
