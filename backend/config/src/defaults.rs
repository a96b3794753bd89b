//! Config defaults: applies default values to a parsed config.

use std::path::PathBuf;

use crate::schema::{ActivityLogConfig, LoggingConfig, QueryConfig, StorageConfig};

/// Store file name, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "user_activity.db";

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

pub const DEFAULT_WINDOW_SECS: i64 = activitylog_core::DEFAULT_WINDOW_SECS;

pub const DEFAULT_MAX_RESULTS: usize = activitylog_core::DEFAULT_QUERY_LIMIT;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: ActivityLogConfig) -> ActivityLogConfig {
    let config = apply_storage_defaults(config);
    let config = apply_query_defaults(config);
    apply_logging_defaults(config)
}

fn apply_storage_defaults(mut config: ActivityLogConfig) -> ActivityLogConfig {
    let storage = config.storage.get_or_insert_with(StorageConfig::default);
    if storage.db_path.is_none() {
        storage.db_path = Some(PathBuf::from(DEFAULT_DB_PATH));
    }
    if storage.busy_timeout_ms.is_none() {
        storage.busy_timeout_ms = Some(DEFAULT_BUSY_TIMEOUT_MS);
    }
    config
}

fn apply_query_defaults(mut config: ActivityLogConfig) -> ActivityLogConfig {
    let query = config.query.get_or_insert_with(QueryConfig::default);
    if query.default_window_secs.is_none() {
        query.default_window_secs = Some(DEFAULT_WINDOW_SECS);
    }
    if query.max_results.is_none() {
        query.max_results = Some(DEFAULT_MAX_RESULTS);
    }
    config
}

/// Log level only; the log directory stays unset (console-only) unless configured.
fn apply_logging_defaults(mut config: ActivityLogConfig) -> ActivityLogConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_section() {
        let cfg = apply_all_defaults(ActivityLogConfig::default());
        let storage = cfg.storage.unwrap();
        assert_eq!(storage.db_path.unwrap(), PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(storage.busy_timeout_ms.unwrap(), DEFAULT_BUSY_TIMEOUT_MS);
        assert_eq!(cfg.query.unwrap().default_window_secs.unwrap(), 86_400);
        assert_eq!(cfg.logging.unwrap().level.unwrap(), "info");
    }

    #[test]
    fn does_not_override_user_values() {
        let cfg = ActivityLogConfig {
            query: Some(QueryConfig {
                max_results: Some(10),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cfg = apply_all_defaults(cfg);
        let query = cfg.query.unwrap();
        assert_eq!(query.max_results.unwrap(), 10);
        assert_eq!(query.default_window_secs.unwrap(), DEFAULT_WINDOW_SECS);
    }
}
