use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One immutable logged event.
///
/// Rows are only ever created by an append; there is no update path, so a
/// record read back from the store is exactly what was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Surrogate key assigned by the store, monotonic with insertion.
    pub id: i64,
    pub user_id: String,
    /// Stored verbatim; may be empty.
    pub message: String,
    /// Assigned by the log's clock at write time.
    pub timestamp: DateTime<Utc>,
}
