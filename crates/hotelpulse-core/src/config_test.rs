use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.roster_path, PathBuf::from("./config/hotels.yaml"));
    assert_eq!(cfg.report_path, PathBuf::from("./hotel_ratings.jsonl"));
    assert!(cfg.csv_path.is_none());
    assert!(cfg.debug_dir.is_none());
    assert_eq!(cfg.max_concurrent_hotels, 5);
    assert_eq!(cfg.session_pool_size, 0);
    assert_eq!(cfg.strategy_timeout_ms, 8000);
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.search_base_url, "https://www.google.com/maps/search/");
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert!((cfg.rating_min - 0.0).abs() < f64::EPSILON);
    assert!((cfg.rating_max - 5.0).abs() < f64::EPSILON);
}

#[test]
fn max_concurrent_hotels_override() {
    let mut map = HashMap::new();
    map.insert("HOTELPULSE_MAX_CONCURRENT_HOTELS", "8");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_concurrent_hotels, 8);
}

#[test]
fn max_concurrent_hotels_invalid() {
    let mut map = HashMap::new();
    map.insert("HOTELPULSE_MAX_CONCURRENT_HOTELS", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HOTELPULSE_MAX_CONCURRENT_HOTELS"),
        "expected InvalidEnvVar(HOTELPULSE_MAX_CONCURRENT_HOTELS), got: {result:?}"
    );
}

#[test]
fn max_concurrent_hotels_rejects_zero() {
    let mut map = HashMap::new();
    map.insert("HOTELPULSE_MAX_CONCURRENT_HOTELS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn strategy_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("HOTELPULSE_STRATEGY_TIMEOUT_MS", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HOTELPULSE_STRATEGY_TIMEOUT_MS"),
        "got: {result:?}"
    );
}

#[test]
fn optional_paths_are_read_and_blank_is_ignored() {
    let mut map = HashMap::new();
    map.insert("HOTELPULSE_CSV_PATH", "out/hotels.csv");
    map.insert("HOTELPULSE_DEBUG_DIR", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.csv_path, Some(PathBuf::from("out/hotels.csv")));
    assert!(cfg.debug_dir.is_none());
}

#[test]
fn rating_bounds_override() {
    let mut map = HashMap::new();
    map.insert("HOTELPULSE_RATING_MIN", "1");
    map.insert("HOTELPULSE_RATING_MAX", "10");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.rating_min - 1.0).abs() < f64::EPSILON);
    assert!((cfg.rating_max - 10.0).abs() < f64::EPSILON);
}

#[test]
fn rating_bounds_rejects_inverted_range() {
    let mut map = HashMap::new();
    map.insert("HOTELPULSE_RATING_MIN", "5");
    map.insert("HOTELPULSE_RATING_MAX", "1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn non_finite_rating_bound_names_the_offending_var() {
    let mut map = HashMap::new();
    map.insert("HOTELPULSE_RATING_MAX", "inf");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HOTELPULSE_RATING_MAX"),
        "got: {result:?}"
    );

    let mut map = HashMap::new();
    map.insert("HOTELPULSE_RATING_MIN", "NaN");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "HOTELPULSE_RATING_MIN"),
        "got: {result:?}"
    );
}

#[test]
fn effective_pool_size_follows_concurrency_when_unset() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.effective_pool_size(3), 3);
    assert_eq!(cfg.effective_pool_size(0), 1);
}

#[test]
fn effective_pool_size_uses_explicit_value() {
    let mut map = HashMap::new();
    map.insert("HOTELPULSE_SESSION_POOL_SIZE", "2");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.effective_pool_size(6), 2);
}
