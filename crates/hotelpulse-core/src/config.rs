use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
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
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional_path = |var: &str| -> Option<PathBuf> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    };

    let log_level = or_default("HOTELPULSE_LOG_LEVEL", "info");
    let roster_path = PathBuf::from(or_default("HOTELPULSE_ROSTER_PATH", "./config/hotels.yaml"));
    let report_path = PathBuf::from(or_default("HOTELPULSE_REPORT_PATH", "./hotel_ratings.jsonl"));
    let csv_path = optional_path("HOTELPULSE_CSV_PATH");
    let debug_dir = optional_path("HOTELPULSE_DEBUG_DIR");

    let max_concurrent_hotels: usize =
        parse_var(&lookup, "HOTELPULSE_MAX_CONCURRENT_HOTELS", "5")?;
    if max_concurrent_hotels == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "HOTELPULSE_MAX_CONCURRENT_HOTELS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let session_pool_size: usize = parse_var(&lookup, "HOTELPULSE_SESSION_POOL_SIZE", "0")?;
    let strategy_timeout_ms: u64 = parse_var(&lookup, "HOTELPULSE_STRATEGY_TIMEOUT_MS", "8000")?;
    let request_timeout_secs: u64 = parse_var(&lookup, "HOTELPULSE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("HOTELPULSE_USER_AGENT", DEFAULT_USER_AGENT);
    let search_base_url = or_default(
        "HOTELPULSE_SEARCH_BASE_URL",
        "https://www.google.com/maps/search/",
    );
    let max_retries: u32 = parse_var(&lookup, "HOTELPULSE_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms: u64 =
        parse_var(&lookup, "HOTELPULSE_RETRY_BACKOFF_BASE_MS", "500")?;

    let rating_min: f64 = parse_var(&lookup, "HOTELPULSE_RATING_MIN", "0.0")?;
    let rating_max: f64 = parse_var(&lookup, "HOTELPULSE_RATING_MAX", "5.0")?;
    for (var, value) in [
        ("HOTELPULSE_RATING_MIN", rating_min),
        ("HOTELPULSE_RATING_MAX", rating_max),
    ] {
        if !value.is_finite() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("{value} is not a finite number"),
            });
        }
    }
    if rating_min > rating_max {
        return Err(ConfigError::InvalidEnvVar {
            var: "HOTELPULSE_RATING_MIN".to_string(),
            reason: format!("{rating_min} is greater than HOTELPULSE_RATING_MAX ({rating_max})"),
        });
    }

    Ok(AppConfig {
        log_level,
        roster_path,
        report_path,
        csv_path,
        debug_dir,
        max_concurrent_hotels,
        session_pool_size,
        strategy_timeout_ms,
        request_timeout_secs,
        user_agent,
        search_base_url,
        max_retries,
        retry_backoff_base_ms,
        rating_min,
        rating_max,
    })
}

fn parse_var<F, T>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
