//! Configuration for tokengate services.
//!
//! Settings are read from a TOML file and can be overridden through
//! environment variables; see [`tg_config::TgConfig::from_env`].
//!
//! [`tg_config::TgConfig::from_env`]: crate::tg_config::TgConfig::from_env

pub mod error;
pub mod prelude;
pub mod tg_config;
