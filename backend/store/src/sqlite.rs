//! SQLite-backed activity store.
//!
//! Wraps a single `rusqlite::Connection` behind an async mutex. Concurrent
//! appends and queries queue on that mutex; SQLite's own busy timeout
//! covers writers from other connections to the same file.
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tokio::sync::Mutex;
use tracing::{debug, info};

use activitylog_core::{ActivityError, ActivityRecord, Result};

use crate::schema;

/// Connection tuning applied at open time.
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { busy_timeout: Duration::from_millis(5000) }
    }
}

pub struct SqliteActivityStore {
    /// `None` once the store has been closed.
    conn: Mutex<Option<Connection>>,
}

impl SqliteActivityStore {
    /// Open (creating if absent) the store file and bring its schema up to date.
    pub fn open(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            ActivityError::StorageUnavailable(format!("open {}: {e}", path.display()))
        })?;
        probe(&conn).map_err(|e| {
            ActivityError::StorageUnavailable(format!("read {}: {e}", path.display()))
        })?;
        conn.busy_timeout(options.busy_timeout)
            .and_then(|_| conn.execute_batch("PRAGMA journal_mode=WAL;"))
            .map_err(|e| {
                ActivityError::StorageUnavailable(format!("configure {}: {e}", path.display()))
            })?;

        schema::migrate(&conn)?;
        info!(path = %path.display(), "Activity store opened");
        Ok(Self { conn: Mutex::new(Some(conn)) })
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ActivityError::StorageUnavailable(format!("open in-memory store: {e}")))?;
        schema::migrate(&conn)?;
        Ok(Self { conn: Mutex::new(Some(conn)) })
    }

    /// Insert one row and return its assigned id.
    pub async fn insert(&self, user_id: &str, message: &str, at: DateTime<Utc>) -> Result<i64> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(closed)?;
        conn.execute(
            "INSERT INTO activity_log (user_id, message, timestamp) VALUES (?1, ?2, ?3)",
            params![user_id, message, at.timestamp_millis()],
        )
        .map_err(|e| persistence("insert activity", e))?;
        Ok(conn.last_insert_rowid())
    }

    /// Records for `user_id` with `timestamp >= since`, oldest first.
    pub async fn select_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Result<Vec<ActivityRecord>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(closed)?;
        // SQLite treats a negative LIMIT as "no limit".
        let limit = limit.map(|l| l.min(i64::MAX as usize) as i64).unwrap_or(-1);

        let mut stmt = conn
            .prepare_cached(
                "SELECT id, user_id, message, timestamp
                 FROM activity_log
                 WHERE user_id = ?1 AND timestamp >= ?2
                 ORDER BY timestamp ASC, id ASC
                 LIMIT ?3",
            )
            .map_err(|e| persistence("prepare window query", e))?;
        let records = stmt
            .query_map(params![user_id, ceil_millis(since), limit], row_to_record)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| persistence("scan activity window", e))?;

        debug!(user = %user_id, count = records.len(), "Scanned activity window");
        Ok(records)
    }

    /// Total number of records stored for `user_id`.
    pub async fn count_for(&self, user_id: &str) -> Result<u64> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(closed)?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM activity_log WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .map_err(|e| persistence("count activity", e))?;
        Ok(count as u64)
    }

    /// Release the connection. Waits for any in-flight operation first.
    pub async fn close(&self) -> Result<()> {
        let mut guard = self.conn.lock().await;
        match guard.take() {
            Some(conn) => conn
                .close()
                .map_err(|(_, e)| persistence("close store", e)),
            None => Ok(()),
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.conn.lock().await.is_none()
    }
}

fn probe(conn: &Connection) -> rusqlite::Result<()> {
    conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))
        .map(|_| ())
}

/// Rows hold whole milliseconds, so a bound inside a millisecond rounds up
/// to keep `timestamp >= since` exact.
fn ceil_millis(at: DateTime<Utc>) -> i64 {
    let millis = at.timestamp_millis();
    if at.timestamp_subsec_nanos() % 1_000_000 != 0 {
        millis + 1
    } else {
        millis
    }
}

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ActivityRecord> {
    let millis: i64 = row.get(3)?;
    let timestamp = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(3, millis))?;
    Ok(ActivityRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        message: row.get(2)?,
        timestamp,
    })
}

fn closed() -> ActivityError {
    ActivityError::PersistenceError("store connection is closed".to_string())
}

fn persistence(action: &str, err: rusqlite::Error) -> ActivityError {
    ActivityError::PersistenceError(format!("{action}: {err}"))
}
