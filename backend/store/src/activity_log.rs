use std::sync::Arc;

use tracing::debug;

use activitylog_core::{ActivityError, ActivityRecord, Clock, QueryWindow, Result, SystemClock};
use logging::redact_sensitive_data;

use crate::manager::StorageManager;

/// Maximum number of message characters echoed into debug logs.
const LOG_PREVIEW_CHARS: usize = 64;

/// Append-and-query engine over the store owned by a `StorageManager`.
///
/// Holds no cache: every successful `append` is visible to the next `query`.
#[derive(Clone)]
pub struct ActivityLog {
    storage: Arc<StorageManager>,
    clock: Arc<dyn Clock>,
}

impl ActivityLog {
    pub fn new(storage: Arc<StorageManager>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    pub fn with_clock(storage: Arc<StorageManager>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Record one message for `user_id`, stamped with the log's clock.
    pub async fn append(&self, user_id: &str, message: &str) -> Result<ActivityRecord> {
        if user_id.is_empty() {
            return Err(ActivityError::InvalidEvent("user id must not be empty".to_string()));
        }
        let store = self.storage.handle()?;
        let timestamp = self.clock.now();
        let id = store.insert(user_id, message, timestamp).await?;

        debug!(
            id,
            user = %user_id,
            at = %timestamp,
            preview = %preview(message),
            "Activity appended"
        );
        Ok(ActivityRecord {
            id,
            user_id: user_id.to_string(),
            message: message.to_string(),
            timestamp,
        })
    }

    /// Records for `user_id` inside the trailing `window`, oldest first
    /// (ties broken by id).
    pub async fn query(&self, user_id: &str, window: QueryWindow) -> Result<Vec<ActivityRecord>> {
        let now = self.clock.now();
        let store = self.storage.handle()?;
        let since = window.lower_bound(now);
        let records = store.select_since(user_id, since, window.limit).await?;
        debug!(user = %user_id, %since, count = records.len(), "Activity queried");
        Ok(records)
    }

    /// The last 24 hours for `user_id`, with the default result cap.
    pub async fn query_last_day(&self, user_id: &str) -> Result<Vec<ActivityRecord>> {
        self.query(user_id, QueryWindow::default()).await
    }

    pub async fn count(&self, user_id: &str) -> Result<u64> {
        self.storage.handle()?.count_for(user_id).await
    }
}

fn preview(message: &str) -> String {
    let clipped: String = message.chars().take(LOG_PREVIEW_CHARS).collect();
    redact_sensitive_data(&clipped)
}
