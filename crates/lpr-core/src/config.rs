use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Root of the Business Profile Performance API.
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://businessprofileperformance.googleapis.com/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
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
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = lookup("DATABASE_URL").ok().filter(|url| !url.is_empty());
    let env = parse_environment(&or_default("LPR_ENV", "development"))?;
    let log_level = or_default("LPR_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("LPR_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("LPR_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("LPR_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "LPR_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        });
    }

    let google_base_url = or_default("LPR_GOOGLE_BASE_URL", DEFAULT_GOOGLE_BASE_URL);
    let google_request_timeout_secs = parse_u64("LPR_GOOGLE_REQUEST_TIMEOUT_SECS", "30")?;
    let google_max_retries = parse_u32("LPR_GOOGLE_MAX_RETRIES", "2")?;
    let google_retry_backoff_base_ms = parse_u64("LPR_GOOGLE_RETRY_BACKOFF_BASE_MS", "500")?;

    let provider_max_concurrent_units = parse_usize("LPR_PROVIDER_MAX_CONCURRENT_UNITS", "4")?;
    if provider_max_concurrent_units == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LPR_PROVIDER_MAX_CONCURRENT_UNITS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let provider_call_timeout_secs = parse_u64("LPR_PROVIDER_CALL_TIMEOUT_SECS", "30")?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        google_base_url,
        google_request_timeout_secs,
        google_max_retries,
        google_retry_backoff_base_ms,
        provider_max_concurrent_units,
        provider_call_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LPR_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
