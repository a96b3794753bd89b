use thiserror::Error;

/// Errors surfaced by the activity log and its storage lifecycle.
#[derive(Debug, Error)]
pub enum ActivityError {
    /// The inbound event is malformed (missing or mistyped user identifier).
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// Append/query attempted before `init` or after `close`.
    #[error("activity log is not ready (store is {0})")]
    NotReady(String),

    /// `close` called without a prior successful `init`.
    #[error("storage manager was never initialized")]
    NotInitialized,

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("schema error: {0}")]
    SchemaError(String),

    #[error("persistence error: {0}")]
    PersistenceError(String),
}

impl ActivityError {
    /// Short machine-readable name, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            ActivityError::InvalidEvent(_) => "invalid_event",
            ActivityError::NotReady(_) => "not_ready",
            ActivityError::NotInitialized => "not_initialized",
            ActivityError::StorageUnavailable(_) => "storage_unavailable",
            ActivityError::SchemaError(_) => "schema_error",
            ActivityError::PersistenceError(_) => "persistence_error",
        }
    }
}

pub type Result<T, E = ActivityError> = std::result::Result<T, E>;
