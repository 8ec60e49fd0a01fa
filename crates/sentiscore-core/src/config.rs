use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Default Azure OpenAI API version, injected at startup when unset.
const DEFAULT_AZURE_API_VERSION: &str = "2024-02-01";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Inject provider-side environment defaults the embedding SDKs expect.
///
/// Some Azure-hosted embedding deployments reject requests without an API
/// version; historically this default was set lazily inside the fetch path.
/// It now runs once at startup so the fetch path stays side-effect free.
pub fn ensure_provider_env_defaults() {
    if std::env::var("AZURE_API_VERSION").is_err() {
        std::env::set_var("AZURE_API_VERSION", DEFAULT_AZURE_API_VERSION);
        tracing::debug!(
            version = DEFAULT_AZURE_API_VERSION,
            "AZURE_API_VERSION not set; using default"
        );
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let provider_url = require("SENTISCORE_PROVIDER_URL")?;
    let provider_api_key = lookup("SENTISCORE_PROVIDER_API_KEY").ok();

    let env = parse_environment(&or_default("SENTISCORE_ENV", "development"));
    let bind_addr = parse_addr("SENTISCORE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SENTISCORE_LOG_LEVEL", "info");
    let provider_timeout_secs = parse_u64("SENTISCORE_PROVIDER_TIMEOUT_SECS", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        provider_url,
        provider_api_key,
        provider_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
