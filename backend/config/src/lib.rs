//! `activitylog-config`: configuration for the activity log.
//!
//! Provides:
//! - Typed config schema (storage, query, logging)
//! - YAML read/write with backup rotation
//! - `ACTIVITYLOG_*` environment overrides
//! - Default value application
//! - Validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, apply_env_overrides_with};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::{ActivityLogConfig, LoggingConfig, QueryConfig, StorageConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::path::Path;

/// Load, apply env overrides and defaults, then validate a config file.
///
/// This is the main entry point for loading a config at runtime. Validation
/// errors abort the load; warnings are logged.
pub async fn load_and_prepare(path: &Path) -> Result<ActivityLogConfig> {
    let config = load_config(path).await?;
    let config = apply_env_overrides(config)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    if let Some(first) = report.errors.first() {
        for error in &report.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
        bail!("invalid configuration ({} error(s)): {first}", report.errors.len());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prepares_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "query:\n  maxResults: 5\n").unwrap();

        let cfg = load_and_prepare(&path).await.unwrap();
        assert_eq!(cfg.max_results(), 5);
        assert!(cfg.storage.is_some());
    }

    #[tokio::test]
    async fn invalid_file_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "query:\n  defaultWindowSecs: -5\n").unwrap();

        let err = load_and_prepare(&path).await.unwrap_err();
        assert!(err.to_string().contains("query.defaultWindowSecs"));
    }

    #[tokio::test]
    async fn unrepresentable_window_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "query:\n  defaultWindowSecs: 9223372036854775807\n").unwrap();

        let err = load_and_prepare(&path).await.unwrap_err();
        assert!(err.to_string().contains("supported range"));
    }
}
