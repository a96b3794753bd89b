//! Config validation with path-qualified messages.

use activitylog_core::max_window;
use thiserror::Error;

use crate::schema::ActivityLogConfig;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

const KNOWN_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn validate(config: &ActivityLogConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_storage(config, &mut report);
    validate_query(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_storage(config: &ActivityLogConfig, report: &mut ValidationReport) {
    let Some(storage) = &config.storage else { return };
    if let Some(path) = &storage.db_path {
        if path.as_os_str().is_empty() {
            report.error("storage.dbPath", "Database path cannot be empty");
        }
    }
    if storage.busy_timeout_ms == Some(0) {
        report.warn(
            "storage.busyTimeoutMs",
            "A zero busy timeout makes concurrent writers fail instead of waiting",
        );
    }
}

fn validate_query(config: &ActivityLogConfig, report: &mut ValidationReport) {
    let Some(query) = &config.query else { return };
    if let Some(secs) = query.default_window_secs {
        if secs <= 0 {
            report.error("query.defaultWindowSecs", "Window must be a positive number of seconds");
        } else if secs > max_window().num_seconds() {
            report.error("query.defaultWindowSecs", "Window exceeds supported range");
        }
    }
    if query.max_results == Some(0) {
        report.error("query.maxResults", "maxResults must be greater than zero");
    }
}

fn validate_logging(config: &ActivityLogConfig, report: &mut ValidationReport) {
    let Some(level) = config.logging.as_ref().and_then(|l| l.level.as_deref()) else {
        return;
    };
    // Anything else is passed to EnvFilter as a directive string.
    if !KNOWN_LEVELS.contains(&level.to_ascii_lowercase().as_str()) && !level.contains('=') {
        report.warn("logging.level", format!("Unrecognized log level '{level}'"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::{LoggingConfig, QueryConfig};

    #[test]
    fn defaults_are_valid() {
        let report = validate(&apply_all_defaults(ActivityLogConfig::default()));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn rejects_non_positive_window() {
        let cfg = ActivityLogConfig {
            query: Some(QueryConfig {
                default_window_secs: Some(0),
                max_results: Some(0),
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].path, "query.defaultWindowSecs");
    }

    #[test]
    fn rejects_window_beyond_supported_range() {
        let cfg = ActivityLogConfig {
            query: Some(QueryConfig {
                default_window_secs: Some(i64::MAX),
                max_results: None,
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, "query.defaultWindowSecs");
        assert!(report.errors[0].message.contains("supported range"));
    }

    #[test]
    fn directive_levels_pass() {
        let cfg = ActivityLogConfig {
            logging: Some(LoggingConfig {
                level: Some("activitylog_store=debug".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(validate(&cfg).warnings.is_empty());
    }
}
