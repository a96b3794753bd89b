//! Storage lifecycle: `Uninitialized -> Ready -> Closed`.
//!
//! The manager is the only owner of the store handle. `ActivityLog` asks it
//! for the handle on every call, so operations outside `Ready` are refused
//! with `NotReady` instead of touching a dead connection.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use activitylog_core::{ActivityError, Result};

use crate::sqlite::{SqliteActivityStore, StoreOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Ready,
    Closed,
}

impl fmt::Display for StoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreState::Uninitialized => "uninitialized",
            StoreState::Ready => "ready",
            StoreState::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    InMemory,
}

enum Slot {
    Uninitialized,
    Ready(Arc<SqliteActivityStore>),
    Closed,
}

impl Slot {
    fn state(&self) -> StoreState {
        match self {
            Slot::Uninitialized => StoreState::Uninitialized,
            Slot::Ready(_) => StoreState::Ready,
            Slot::Closed => StoreState::Closed,
        }
    }
}

pub struct StorageManager {
    location: Location,
    options: StoreOptions,
    slot: RwLock<Slot>,
}

impl StorageManager {
    /// A manager for the store file at `path`. Nothing is opened until `init`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::at(Location::File(path.into()))
    }

    /// A manager backed by a private in-memory database.
    pub fn in_memory() -> Self {
        Self::at(Location::InMemory)
    }

    fn at(location: Location) -> Self {
        Self {
            location,
            options: StoreOptions::default(),
            slot: RwLock::new(Slot::Uninitialized),
        }
    }

    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::InMemory => None,
        }
    }

    pub fn state(&self) -> StoreState {
        self.slot.read().unwrap_or_else(|e| e.into_inner()).state()
    }

    /// Open the store and ensure its schema. A no-op when already `Ready`.
    ///
    /// Opening and migrating run synchronously on the calling thread.
    pub async fn init(&self) -> Result<()> {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        if let Slot::Ready(_) = *slot {
            info!("Storage already initialized; keeping existing handle");
            return Ok(());
        }

        let store = match &self.location {
            Location::File(path) => SqliteActivityStore::open(path, self.options)?,
            Location::InMemory => SqliteActivityStore::in_memory()?,
        };
        *slot = Slot::Ready(Arc::new(store));
        info!(location = ?self.location, "Storage initialized");
        Ok(())
    }

    /// Release the store handle. Reports `NotInitialized` unless `Ready`.
    pub async fn close(&self) -> Result<()> {
        let store = {
            let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
            match std::mem::replace(&mut *slot, Slot::Closed) {
                Slot::Ready(store) => store,
                previous => {
                    *slot = previous;
                    return Err(ActivityError::NotInitialized);
                }
            }
        };

        if let Err(e) = store.close().await {
            warn!(error = %e, "Storage close reported an error");
            return Err(e);
        }
        info!("Storage closed");
        Ok(())
    }

    /// The live store handle, or `NotReady` outside the `Ready` state.
    pub fn handle(&self) -> Result<Arc<SqliteActivityStore>> {
        match &*self.slot.read().unwrap_or_else(|e| e.into_inner()) {
            Slot::Ready(store) => Ok(Arc::clone(store)),
            other => Err(ActivityError::NotReady(other.state().to_string())),
        }
    }
}
