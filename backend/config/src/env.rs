//! Environment variable overrides for config values.
//!
//! Overrides are applied after the file is parsed and before defaults, so
//! an environment variable always beats the file.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::schema::{ActivityLogConfig, LoggingConfig, QueryConfig, StorageConfig};

pub const ENV_DB_PATH: &str = "ACTIVITYLOG_DB";
pub const ENV_LOG_LEVEL: &str = "ACTIVITYLOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ACTIVITYLOG_LOG_DIR";
pub const ENV_WINDOW_SECS: &str = "ACTIVITYLOG_WINDOW_SECS";
pub const ENV_MAX_RESULTS: &str = "ACTIVITYLOG_MAX_RESULTS";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: ActivityLogConfig) -> Result<ActivityLogConfig> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply overrides from a provided map (useful for testing).
pub fn apply_env_overrides_with(
    mut config: ActivityLogConfig,
    env: &HashMap<String, String>,
) -> Result<ActivityLogConfig> {
    let get = |key: &str| env.get(key).filter(|v| !v.trim().is_empty());

    if let Some(path) = get(ENV_DB_PATH) {
        config.storage.get_or_insert_with(StorageConfig::default).db_path =
            Some(PathBuf::from(path));
    }
    if let Some(secs) = get(ENV_WINDOW_SECS) {
        let secs: i64 = secs
            .trim()
            .parse()
            .with_context(|| format!("{ENV_WINDOW_SECS} must be an integer, got {secs:?}"))?;
        config.query.get_or_insert_with(QueryConfig::default).default_window_secs = Some(secs);
    }
    if let Some(max) = get(ENV_MAX_RESULTS) {
        let max: usize = max
            .trim()
            .parse()
            .with_context(|| format!("{ENV_MAX_RESULTS} must be a positive integer, got {max:?}"))?;
        config.query.get_or_insert_with(QueryConfig::default).max_results = Some(max);
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.clone());
    }
    if let Some(dir) = get(ENV_LOG_DIR) {
        config.logging.get_or_insert_with(LoggingConfig::default).dir = Some(PathBuf::from(dir));
    }
    Ok(config)
}
