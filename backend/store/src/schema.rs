//! Versioned, additive schema for the `activity_log` table.
//!
//! The version lives in `PRAGMA user_version`. Every step uses
//! `IF NOT EXISTS`, so migrating an up-to-date store is a no-op.

use rusqlite::Connection;
use tracing::{debug, info};

use activitylog_core::{ActivityError, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Index `i` upgrades the store from version `i` to `i + 1`.
const MIGRATIONS: [&str; CURRENT_SCHEMA_VERSION as usize] = [
    // v1: the log itself
    "CREATE TABLE IF NOT EXISTS activity_log (
         id        INTEGER PRIMARY KEY AUTOINCREMENT,
         user_id   TEXT NOT NULL CHECK (length(user_id) > 0),
         message   TEXT NOT NULL,
         timestamp INTEGER NOT NULL
     );
     CREATE INDEX IF NOT EXISTS idx_activity_log_user_id ON activity_log(user_id);
     CREATE INDEX IF NOT EXISTS idx_activity_log_timestamp ON activity_log(timestamp);",
    // v2: covering index for the per-user window scan
    "CREATE INDEX IF NOT EXISTS idx_activity_log_user_window
         ON activity_log(user_id, timestamp, id);",
];

const REQUIRED_COLUMNS: [&str; 4] = ["id", "user_id", "message", "timestamp"];

/// Bring the store up to `CURRENT_SCHEMA_VERSION` and verify the table shape.
///
/// Returns the version the store was at before migrating.
pub fn migrate(conn: &Connection) -> Result<i32> {
    let version = user_version(conn)?;
    if version > CURRENT_SCHEMA_VERSION {
        return Err(ActivityError::SchemaError(format!(
            "store schema version {version} is newer than supported version {CURRENT_SCHEMA_VERSION}"
        )));
    }

    for (step, sql) in MIGRATIONS.iter().enumerate().skip(version.max(0) as usize) {
        let target = step as i32 + 1;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| schema_error("begin migration", e))?;
        tx.execute_batch(sql)
            .map_err(|e| schema_error(&format!("apply migration v{target}"), e))?;
        tx.pragma_update(None, "user_version", target)
            .map_err(|e| schema_error("record schema version", e))?;
        tx.commit()
            .map_err(|e| schema_error(&format!("commit migration v{target}"), e))?;
        info!(version = target, "Applied activity_log migration");
    }

    verify_columns(conn)?;
    debug!(from = version, to = CURRENT_SCHEMA_VERSION, "activity_log schema verified");
    Ok(version)
}

pub fn user_version(conn: &Connection) -> Result<i32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| schema_error("read schema version", e))
}

fn verify_columns(conn: &Connection) -> Result<()> {
    let mut stmt = conn
        .prepare("PRAGMA table_info(activity_log)")
        .map_err(|e| schema_error("inspect activity_log", e))?;
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .and_then(|rows| rows.collect())
        .map_err(|e| schema_error("inspect activity_log", e))?;

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !columns.iter().any(|existing| existing == c))
        .collect();
    if !missing.is_empty() {
        return Err(ActivityError::SchemaError(format!(
            "activity_log is missing columns: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

fn schema_error(action: &str, err: rusqlite::Error) -> ActivityError {
    ActivityError::SchemaError(format!("{action}: {err}"))
}
