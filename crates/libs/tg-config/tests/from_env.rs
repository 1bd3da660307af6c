use std::io::Write;

use serial_test::serial;
use tg_auth::signing_key::HmacAlgorithm;
use tg_config::tg_config::{
    BIND_ADDRESS_VAR, CONFIG_PATH_VAR, JWT_ALGORITHM_VAR, JWT_ALLOW_GENERATED_KEY_VAR,
    JWT_EXPIRATION_MS_VAR, JWT_SECRET_VAR, TgConfig,
};

const VARS: [&str; 6] = [
    CONFIG_PATH_VAR,
    JWT_SECRET_VAR,
    JWT_ALGORITHM_VAR,
    JWT_EXPIRATION_MS_VAR,
    JWT_ALLOW_GENERATED_KEY_VAR,
    BIND_ADDRESS_VAR,
];

fn clear_env() {
    for var in VARS {
        // SAFETY: tests touching the environment are serialized.
        unsafe { std::env::remove_var(var) };
    }
}

fn set_env(var: &str, value: &str) {
    // SAFETY: tests touching the environment are serialized.
    unsafe { std::env::set_var(var, value) };
}

#[test]
#[serial]
fn without_anything_set_the_secret_is_missing() {
    clear_env();
    let config = TgConfig::from_env().unwrap();
    assert!(config.auth.secret.is_empty());
    assert!(config.auth.signing_key().is_err());
}

#[test]
#[serial]
fn file_then_environment() {
    clear_env();
    let path = std::env::temp_dir().join(format!("tg-config-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
        [auth]
        secret = "file-secret-file-secret-file-secret-file-secret-file"
        algorithm = "HS384"
        validity_ms = 60000
        "#
    )
    .unwrap();

    set_env(CONFIG_PATH_VAR, path.to_str().unwrap());
    set_env(JWT_EXPIRATION_MS_VAR, "120000");

    let config = TgConfig::from_env().unwrap();
    assert_eq!(config.auth.algorithm, HmacAlgorithm::HS384);
    assert_eq!(config.auth.validity_ms, 120_000);
    assert_eq!(config.auth.signing_key().unwrap().len(), 48);

    clear_env();
    std::fs::remove_file(path).unwrap();
}

#[test]
#[serial]
fn bad_override_is_reported() {
    clear_env();
    set_env(JWT_EXPIRATION_MS_VAR, "forever");
    assert!(TgConfig::from_env().is_err());
    clear_env();
}

#[test]
#[serial]
fn missing_file_is_an_io_error() {
    clear_env();
    set_env(CONFIG_PATH_VAR, "/definitely/not/here/tokengate.toml");
    assert!(matches!(
        TgConfig::from_env(),
        Err(tg_config::error::Error::IO(_))
    ));
    clear_env();
}
