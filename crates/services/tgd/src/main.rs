//! tokengate daemon (tgd)
//!
//! Serves signup, login and token-protected endpoints over HTTP.
//!
//! # Examples
//!
//! ```bash
//! export JWT_SECRET=$(openssl rand -base64 48)
//! export TG_BIND_ADDRESS=0.0.0.0:3000
//! tgd
//! ```
//!
//! A TOML file can be given through `TG_CONFIG`; environment variables
//! override its values.

use tg_config::tg_config::TgConfig;
use tgd::{api::setup_api, prelude::*, state::TgState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,tg_web=debug,tower_http=debug",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TgConfig::from_env().inspect_err(|err| {
        tracing::error!("Failed to load configuration: {err}");
    })?;
    let state = TgState::from_config(&config).await.inspect_err(|err| {
        tracing::error!("Failed to start: {err}");
    })?;
    let (_, api_handle) = setup_api(state, config.server.address).await?;

    tokio::select! {
        result = api_handle => {
            tracing::error!("API server stopped: {:?}", result);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
