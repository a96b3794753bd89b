//! Durable storage for the activity log.
//!
//! `StorageManager` owns the single SQLite handle for the life of the
//! process; `ActivityLog` borrows it to append and query records.

pub mod activity_log;
pub mod manager;
pub mod schema;
pub mod sqlite;

pub use activity_log::ActivityLog;
pub use manager::{StorageManager, StoreState};
pub use schema::CURRENT_SCHEMA_VERSION;
pub use sqlite::{SqliteActivityStore, StoreOptions};
