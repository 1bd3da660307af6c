//! Error types for the tokengate service.

/// Errors that can occur while starting or running the service.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Auth(#[from] tg_auth::error::Error),

    #[error(transparent)]
    Config(#[from] tg_config::error::Error),

    #[error(transparent)]
    Model(#[from] tg_models::error::Error),

    #[error(transparent)]
    Web(#[from] tg_web::error::Error),
}
