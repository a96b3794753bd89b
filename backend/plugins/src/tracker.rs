//! User activity tracker: logs every message sent through the host and
//! answers "what did this user do recently" queries.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{info, warn};

use activitylog_core::{ActivityRecord, Clock, InboundMessage, QueryWindow, Result};
use activitylog_store::{ActivityLog, StorageManager};

use crate::lifecycle::{MessengerPlugin, PluginState};

pub const PLUGIN_NAME: &str = "user-activity-tracker";

pub struct ActivityTrackerPlugin {
    storage: Arc<StorageManager>,
    log: ActivityLog,
    default_window: QueryWindow,
    state: Mutex<PluginState>,
}

impl ActivityTrackerPlugin {
    pub fn new(storage: StorageManager) -> Self {
        let storage = Arc::new(storage);
        let log = ActivityLog::new(storage.clone());
        Self::assemble(storage, log)
    }

    pub fn with_clock(storage: StorageManager, clock: Arc<dyn Clock>) -> Self {
        let storage = Arc::new(storage);
        let log = ActivityLog::with_clock(storage.clone(), clock);
        Self::assemble(storage, log)
    }

    fn assemble(storage: Arc<StorageManager>, log: ActivityLog) -> Self {
        Self {
            storage,
            log,
            default_window: QueryWindow::default(),
            state: Mutex::new(PluginState::Unloaded),
        }
    }

    /// Window used by `check_user_activity`.
    pub fn with_default_window(mut self, window: QueryWindow) -> Self {
        self.default_window = window;
        self
    }

    pub fn state(&self) -> PluginState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: PluginState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    pub fn activity_log(&self) -> &ActivityLog {
        &self.log
    }

    /// Records for `user_id` inside the trailing `window`, oldest first.
    pub async fn check_activity(
        &self,
        user_id: &str,
        window: QueryWindow,
    ) -> Result<Vec<ActivityRecord>> {
        self.log.query(user_id, window).await
    }

    /// Records for `user_id` inside the plugin's default window (24h).
    pub async fn check_user_activity(&self, user_id: &str) -> Result<Vec<ActivityRecord>> {
        self.check_activity(user_id, self.default_window).await
    }
}

#[async_trait]
impl MessengerPlugin for ActivityTrackerPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    async fn init(&self) -> Result<()> {
        match self.storage.init().await {
            Ok(()) => {
                self.set_state(PluginState::Active);
                info!("User activity tracker plugin initialized");
                Ok(())
            }
            Err(e) => {
                self.set_state(PluginState::Failed);
                Err(e)
            }
        }
    }

    async fn send_message(&self, message: &InboundMessage) -> Result<ActivityRecord> {
        let user_id = message.user_id().inspect_err(|e| {
            warn!(error = %e, "Rejected inbound message");
        })?;
        let record = self.log.append(user_id, &message.message).await?;
        info!(user = %record.user_id, at = %record.timestamp, "Message logged");
        Ok(record)
    }

    async fn close(&self) -> Result<()> {
        let result = self.storage.close().await;
        // Only an active plugin becomes `Closed`; `Unloaded` and `Failed` stay put.
        if self.state() == PluginState::Active {
            self.set_state(PluginState::Closed);
            info!("User activity tracker plugin closed");
        }
        result
    }
}
