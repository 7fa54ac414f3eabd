use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_DIRECTORY_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

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

    let env = parse_environment(&or_default("MEDFINDER_ENV", "development"));
    let bind_addr = parse_addr("MEDFINDER_BIND_ADDR", "0.0.0.0:5001")?;
    let log_level = or_default("MEDFINDER_LOG_LEVEL", "info");

    // Blank keys count as unset so a templated `.env` does not look configured.
    let google_api_key = lookup("GOOGLE_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let places_base_url = or_default(
        "MEDFINDER_PLACES_BASE_URL",
        "https://maps.googleapis.com/maps/api",
    );
    let places_timeout_secs = parse_u64("MEDFINDER_PLACES_TIMEOUT_SECS", "10")?;
    let places_page_delay_ms = parse_u64("MEDFINDER_PLACES_PAGE_DELAY_MS", "2000")?;

    let directory_base_url = or_default("MEDFINDER_DIRECTORY_BASE_URL", "https://www.lybrate.com");
    let directory_timeout_secs = parse_u64("MEDFINDER_DIRECTORY_TIMEOUT_SECS", "15")?;
    let directory_user_agent = or_default(
        "MEDFINDER_DIRECTORY_USER_AGENT",
        DEFAULT_DIRECTORY_USER_AGENT,
    );

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        google_api_key,
        places_base_url,
        places_timeout_secs,
        places_page_delay_ms,
        directory_base_url,
        directory_timeout_secs,
        directory_user_agent,
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

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
