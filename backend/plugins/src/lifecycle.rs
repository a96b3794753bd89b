//! Plugin lifecycle: the hooks a messaging host drives, and the load/unload
//! sequences that wrap them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use activitylog_core::{ActivityRecord, InboundMessage, Result};

/// Current state of a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginState {
    Unloaded,
    Active,
    Failed,
    Closed,
}

/// Hooks a messaging host calls on a plugin.
#[async_trait]
pub trait MessengerPlugin: Send + Sync {
    fn name(&self) -> &str;
    /// Acquire resources. An error keeps the plugin inactive.
    async fn init(&self) -> Result<()>;
    /// Handle one message sent through the host.
    async fn send_message(&self, message: &InboundMessage) -> Result<ActivityRecord>;
    /// Release resources. Called once at shutdown.
    async fn close(&self) -> Result<()>;
}

/// Run the load sequence: `init`, then report the resulting state.
pub async fn run_load_sequence(plugin: &dyn MessengerPlugin) -> Result<PluginState> {
    debug!(plugin = %plugin.name(), "Running load sequence");
    match plugin.init().await {
        Ok(()) => {
            info!(plugin = %plugin.name(), "Plugin loaded");
            Ok(PluginState::Active)
        }
        Err(e) => {
            warn!(plugin = %plugin.name(), error = %e, kind = e.kind(), "Plugin failed to load");
            Err(e)
        }
    }
}

/// Run the unload sequence. Close failures are logged, never propagated.
pub async fn run_unload_sequence(plugin: &dyn MessengerPlugin) -> PluginState {
    debug!(plugin = %plugin.name(), "Running unload sequence");
    if let Err(e) = plugin.close().await {
        warn!(plugin = %plugin.name(), error = %e, "close failed");
    }
    info!(plugin = %plugin.name(), "Plugin unloaded");
    PluginState::Closed
}
