//! Activity log configuration schema.
//!
//! Every field is optional on disk; `defaults::apply_all_defaults` fills
//! the gaps, so code downstream of `load_and_prepare` can rely on the
//! accessor methods below.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use activitylog_core::{max_window, QueryWindow};

use crate::defaults::{
    DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DB_PATH, DEFAULT_LOG_LEVEL, DEFAULT_MAX_RESULTS,
    DEFAULT_WINDOW_SECS,
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    /// SQLite file holding the activity log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    /// How long a writer waits on a locked database before failing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryConfig {
    /// Trailing window used when a caller does not pass one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_window_secs: Option<i64>,
    /// Cap on records returned by one query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling JSON log files; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl ActivityLogConfig {
    pub fn db_path(&self) -> PathBuf {
        self.storage
            .as_ref()
            .and_then(|s| s.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
    }

    pub fn busy_timeout(&self) -> Duration {
        let ms = self
            .storage
            .as_ref()
            .and_then(|s| s.busy_timeout_ms)
            .unwrap_or(DEFAULT_BUSY_TIMEOUT_MS);
        Duration::from_millis(ms)
    }

    /// The configured default window. Spans beyond `max_window` are
    /// clamped; `validate` reports them as errors.
    pub fn default_window(&self) -> QueryWindow {
        let query = self.query.as_ref();
        let secs = query
            .and_then(|q| q.default_window_secs)
            .unwrap_or(DEFAULT_WINDOW_SECS);
        let limit = query.and_then(|q| q.max_results).unwrap_or(DEFAULT_MAX_RESULTS);
        let duration = chrono::Duration::try_seconds(secs)
            .filter(|d| *d <= max_window())
            .unwrap_or_else(max_window);
        QueryWindow::new(duration).with_limit(limit)
    }

    pub fn max_results(&self) -> usize {
        self.query
            .as_ref()
            .and_then(|q| q.max_results)
            .unwrap_or(DEFAULT_MAX_RESULTS)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&std::path::Path> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = "
storage:
  dbPath: /var/lib/activity.db
  busyTimeoutMs: 250
query:
  defaultWindowSecs: 3600
  maxResults: 50
logging:
  level: debug
";
        let cfg: ActivityLogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.db_path(), PathBuf::from("/var/lib/activity.db"));
        assert_eq!(cfg.busy_timeout(), Duration::from_millis(250));
        let window = cfg.default_window();
        assert_eq!(window.duration, chrono::Duration::hours(1));
        assert_eq!(window.limit, Some(50));
        assert_eq!(cfg.log_level(), "debug");
        assert!(cfg.log_dir().is_none());
    }

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let cfg = ActivityLogConfig::default();
        assert_eq!(cfg.db_path(), PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(cfg.default_window(), QueryWindow::default());
    }

    #[test]
    fn oversized_window_is_clamped() {
        let yaml = "
query:
  defaultWindowSecs: 9223372036854775807
";
        let cfg: ActivityLogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.default_window().duration, max_window());
    }
}
