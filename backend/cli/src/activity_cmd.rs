//! CLI Activity Subcommands
//!
//! Each command opens the store through the tracker plugin, does one thing,
//! and unloads the plugin again before returning its JSON report.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use activitylog_config::{write_config, ActivityLogConfig};
use activitylog_core::{parse_window, InboundMessage, QueryWindow};
use activitylog_plugin::{
    run_load_sequence, run_unload_sequence, ActivityTrackerPlugin, MessengerPlugin, PluginState,
};
use activitylog_store::{StorageManager, StoreOptions, CURRENT_SCHEMA_VERSION};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    db_path: String,
    state: PluginState,
    schema_version: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<u64>,
}

async fn open_tracker(config: &ActivityLogConfig) -> Result<ActivityTrackerPlugin> {
    let db_path = config.db_path();
    let storage = StorageManager::new(&db_path).with_options(StoreOptions {
        busy_timeout: config.busy_timeout(),
    });
    let plugin =
        ActivityTrackerPlugin::new(storage).with_default_window(config.default_window());
    debug!(db = %db_path.display(), "Opening activity store");
    run_load_sequence(&plugin)
        .await
        .with_context(|| format!("Failed to open activity store at {}", db_path.display()))?;
    Ok(plugin)
}

/// Resolve `--window`/`--limit` against the configured defaults.
fn resolve_window(
    config: &ActivityLogConfig,
    window: Option<&str>,
    limit: Option<usize>,
) -> Result<QueryWindow> {
    let base = match window {
        Some(raw) => {
            let duration = parse_window(raw)
                .ok_or_else(|| anyhow!("invalid window '{raw}' (expected e.g. 90s, 30m, 3h, 2d)"))?;
            QueryWindow::new(duration).with_limit(config.max_results())
        }
        None => config.default_window(),
    };
    match limit {
        Some(0) => Err(anyhow!("--limit must be greater than zero")),
        Some(n) => Ok(base.with_limit(n)),
        None => Ok(base),
    }
}

pub async fn init(config: &ActivityLogConfig, config_path: &Path) -> Result<Value> {
    let plugin = open_tracker(config).await?;
    run_unload_sequence(&plugin).await;

    let wrote_config = if config_path.exists() {
        false
    } else {
        write_config(config, config_path).await?;
        true
    };
    info!(config = %config_path.display(), wrote_config, "Activity store initialized");
    Ok(json!({
        "dbPath": config.db_path(),
        "schemaVersion": CURRENT_SCHEMA_VERSION,
        "configPath": config_path,
        "wroteConfig": wrote_config,
    }))
}

pub async fn log(config: &ActivityLogConfig, user: &str, message: &str) -> Result<Value> {
    let plugin = open_tracker(config).await?;
    let result = plugin
        .send_message(&InboundMessage::new(message).from_user(user))
        .await;
    run_unload_sequence(&plugin).await;
    let record = result?;
    info!(user = %record.user_id, id = record.id, "Logged message");
    Ok(serde_json::to_value(record)?)
}

pub async fn check(
    config: &ActivityLogConfig,
    user: &str,
    window: Option<&str>,
    limit: Option<usize>,
) -> Result<Value> {
    let window = resolve_window(config, window, limit)?;
    let plugin = open_tracker(config).await?;
    let result = plugin.check_activity(user, window).await;
    run_unload_sequence(&plugin).await;
    let records = result?;
    info!(
        user = %user,
        window_secs = window.duration.num_seconds(),
        count = records.len(),
        "Checked activity"
    );
    Ok(json!({
        "user": user,
        "windowSecs": window.duration.num_seconds(),
        "limit": window.limit,
        "count": records.len(),
        "records": records,
    }))
}

pub async fn status(config: &ActivityLogConfig, user: Option<&str>) -> Result<Value> {
    let plugin = open_tracker(config).await?;
    let state = plugin.state();
    let records = match user {
        Some(user) => Some(plugin.activity_log().count(user).await),
        None => None,
    };
    run_unload_sequence(&plugin).await;

    let report = StatusReport {
        db_path: config.db_path().display().to_string(),
        state,
        schema_version: CURRENT_SCHEMA_VERSION,
        user: user.map(str::to_string),
        records: records.transpose()?,
    };
    Ok(serde_json::to_value(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use activitylog_config::{apply_all_defaults, StorageConfig};

    fn config_in(dir: &Path) -> ActivityLogConfig {
        apply_all_defaults(ActivityLogConfig {
            storage: Some(StorageConfig {
                db_path: Some(dir.join("activity.db")),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn log_then_check() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        log(&config, "alice", "hello").await.unwrap();
        log(&config, "alice", "world").await.unwrap();
        log(&config, "bob", "hi").await.unwrap();

        let report = check(&config, "alice", Some("1h"), None).await.unwrap();
        assert_eq!(report["count"], 2);
        assert_eq!(report["records"][0]["message"], "hello");
        assert_eq!(report["records"][1]["message"], "world");

        let capped = check(&config, "alice", None, Some(1)).await.unwrap();
        assert_eq!(capped["count"], 1);
        assert_eq!(capped["windowSecs"], 86_400);
    }

    #[tokio::test]
    async fn status_counts_records() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        log(&config, "alice", "hello").await.unwrap();

        let report = status(&config, Some("alice")).await.unwrap();
        assert_eq!(report["records"], 1);
        assert_eq!(report["state"], "active");
        assert_eq!(report["schemaVersion"], CURRENT_SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn init_writes_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let config_path = dir.path().join("config.yaml");

        let first = init(&config, &config_path).await.unwrap();
        assert_eq!(first["wroteConfig"], true);
        assert!(dir.path().join("activity.db").exists());

        let second = init(&config, &config_path).await.unwrap();
        assert_eq!(second["wroteConfig"], false);
    }

    #[test]
    fn rejects_bad_window_and_limit() {
        let config = apply_all_defaults(ActivityLogConfig::default());
        assert!(resolve_window(&config, Some("soon"), None).is_err());
        assert!(resolve_window(&config, None, Some(0)).is_err());

        let window = resolve_window(&config, Some("30m"), Some(5)).unwrap();
        assert_eq!(window.duration.num_minutes(), 30);
        assert_eq!(window.limit, Some(5));
    }

    #[tokio::test]
    async fn empty_user_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let err = log(&config, "", "hello").await.unwrap_err();
        assert!(err.to_string().contains("invalid event"));
    }
}
