//! Core configuration types.

use std::{net::SocketAddr, path::Path};

use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tg_auth::signing_key::{HmacAlgorithm, KeyPolicy, SigningKey};
use tracing::{info, warn};

use crate::prelude::*;

/// Path of the TOML configuration file.
pub const CONFIG_PATH_VAR: &str = "TG_CONFIG";
pub const JWT_SECRET_VAR: &str = "JWT_SECRET";
pub const JWT_ALGORITHM_VAR: &str = "JWT_ALGORITHM";
pub const JWT_EXPIRATION_MS_VAR: &str = "JWT_EXPIRATION_MS";
pub const JWT_ALLOW_GENERATED_KEY_VAR: &str = "JWT_ALLOW_GENERATED_KEY";
pub const BIND_ADDRESS_VAR: &str = "TG_BIND_ADDRESS";

/// 24 hours.
pub const DEFAULT_VALIDITY_MS: u64 = 86_400_000;
/// Name of the token lifetime setting in the `[auth]` table.
pub const VALIDITY_MS_KEY: &str = "validity_ms";

fn default_validity_ms() -> u64 {
    DEFAULT_VALIDITY_MS
}

fn default_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_roles() -> Vec<String> {
    vec![String::from("USER")]
}

/// Token signing settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret. Must be at least as long as the algorithm's digest.
    #[serde(default)]
    pub secret: String,
    #[serde(default)]
    pub algorithm: HmacAlgorithm,
    /// Token lifetime in milliseconds.
    #[serde(default = "default_validity_ms")]
    pub validity_ms: u64,
    /// Substitute a random key for a too short secret instead of failing.
    /// Development only.
    #[serde(default)]
    pub allow_generated_key: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            algorithm: HmacAlgorithm::default(),
            validity_ms: DEFAULT_VALIDITY_MS,
            allow_generated_key: false,
        }
    }
}

impl AuthConfig {
    /// Token lifetime.
    ///
    /// Fails for a zero lifetime and for one so long that an expiry time
    /// can no longer be computed from the current time.
    pub fn validity(&self) -> Result<TimeDelta> {
        i64::try_from(self.validity_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .and_then(TimeDelta::try_milliseconds)
            .filter(|validity| Utc::now().checked_add_signed(*validity).is_some())
            .ok_or_else(|| Error::InvalidValue {
                var: VALIDITY_MS_KEY,
                value: self.validity_ms.to_string(),
            })
    }

    pub fn key_policy(&self) -> KeyPolicy {
        if self.allow_generated_key {
            KeyPolicy::GenerateIfWeak
        } else {
            KeyPolicy::Strict
        }
    }

    /// Resolves the signing key, failing with `WeakConfiguredKey` for a
    /// short secret unless generation was explicitly allowed.
    pub fn signing_key(&self) -> tg_auth::prelude::Result<SigningKey> {
        SigningKey::from_secret(self.secret.as_bytes(), self.algorithm, self.key_policy())
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"REDACTED")
            .field("algorithm", &self.algorithm)
            .field("validity_ms", &self.validity_ms)
            .field("allow_generated_key", &self.allow_generated_key)
            .finish()
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

/// An account created at startup.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAccount {
    pub identity: String,
    pub password: String,
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
}

impl std::fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAccount")
            .field("identity", &self.identity)
            .field("password", &"REDACTED")
            .field("roles", &self.roles)
            .finish()
    }
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TgConfig {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
}

impl TgConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }

    /// Load configuration from the file named by `TG_CONFIG` (defaults if
    /// unset), then apply the `JWT_*` and `TG_BIND_ADDRESS` overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => {
                info!("Loading configuration from {path}");
                Self::from_file(Path::new(&path))?
            }
            Err(_) => {
                info!("{CONFIG_PATH_VAR} not set, using default configuration");
                Self::default()
            }
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Applies overrides obtained from `lookup`, keyed by variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup(JWT_SECRET_VAR) {
            self.auth.secret = secret;
        }
        if let Some(value) = lookup(JWT_ALGORITHM_VAR) {
            self.auth.algorithm = value.parse().map_err(|_| Error::InvalidValue {
                var: JWT_ALGORITHM_VAR,
                value,
            })?;
        }
        if let Some(value) = lookup(JWT_EXPIRATION_MS_VAR) {
            self.auth.validity_ms = value.parse().map_err(|_| Error::InvalidValue {
                var: JWT_EXPIRATION_MS_VAR,
                value,
            })?;
        }
        if let Some(value) = lookup(JWT_ALLOW_GENERATED_KEY_VAR) {
            self.auth.allow_generated_key = parse_bool(&value).ok_or(Error::InvalidValue {
                var: JWT_ALLOW_GENERATED_KEY_VAR,
                value,
            })?;
        }
        if let Some(value) = lookup(BIND_ADDRESS_VAR) {
            self.server.address = value.parse().map_err(|_| Error::InvalidValue {
                var: BIND_ADDRESS_VAR,
                value,
            })?;
        }
        if self.auth.allow_generated_key {
            warn!("Random signing key generation is allowed; do not use this in production");
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
