//! Host Bus
//!
//! Broadcast channel carrying inbound messages from the host to plugins,
//! and the serve loop that feeds them into a plugin.

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use activitylog_core::InboundMessage;

use crate::lifecycle::MessengerPlugin;

const DEFAULT_CAPACITY: usize = 1024;

pub struct HostBus {
    sender: broadcast::Sender<InboundMessage>,
}

impl HostBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { sender: tx }
    }

    /// Deliver a message to every subscribed plugin. Returns how many
    /// subscribers received it (0 when none are listening).
    pub fn publish(&self, message: InboundMessage) -> usize {
        self.sender.send(message).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InboundMessage> {
        self.sender.subscribe()
    }
}

impl Default for HostBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters reported when a serve loop ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServeStats {
    pub logged: u64,
    pub rejected: u64,
    pub skipped: u64,
}

/// Feed messages from `rx` into `plugin` until every sender is gone.
///
/// A failing message is logged and counted; it never stops the loop.
pub async fn serve(
    plugin: &dyn MessengerPlugin,
    mut rx: broadcast::Receiver<InboundMessage>,
) -> ServeStats {
    let mut stats = ServeStats::default();
    loop {
        match rx.recv().await {
            Ok(message) => match plugin.send_message(&message).await {
                Ok(record) => {
                    debug!(plugin = %plugin.name(), id = record.id, "Delivered message");
                    stats.logged += 1;
                }
                Err(e) => {
                    warn!(plugin = %plugin.name(), error = %e, kind = e.kind(), "Message not logged");
                    stats.rejected += 1;
                }
            },
            Err(RecvError::Lagged(n)) => {
                warn!(plugin = %plugin.name(), skipped = n, "Plugin fell behind the host bus");
                stats.skipped += n;
            }
            Err(RecvError::Closed) => break,
        }
    }
    info!(
        plugin = %plugin.name(),
        logged = stats.logged,
        rejected = stats.rejected,
        skipped = stats.skipped,
        "Host bus closed"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use activitylog_store::StorageManager;

    use crate::tracker::ActivityTrackerPlugin;

    #[tokio::test]
    async fn test_serve_logs_until_bus_closes() {
        let plugin = Arc::new(ActivityTrackerPlugin::new(StorageManager::in_memory()));
        plugin.init().await.unwrap();

        let bus = HostBus::new();
        let rx = bus.subscribe();
        let worker = {
            let plugin = plugin.clone();
            tokio::spawn(async move { serve(plugin.as_ref(), rx).await })
        };

        assert_eq!(bus.publish(InboundMessage::new("one").from_user("alice")), 1);
        bus.publish(InboundMessage::new("no user"));
        bus.publish(InboundMessage::new("two").from_user("alice"));
        drop(bus);

        let stats = worker.await.unwrap();
        assert_eq!(stats, ServeStats { logged: 2, rejected: 1, skipped: 0 });

        let records = plugin.check_user_activity("alice").await.unwrap();
        let messages: Vec<_> = records.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, ["one", "two"]);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = HostBus::default();
        assert_eq!(bus.publish(InboundMessage::new("lost").from_user("alice")), 0);
    }
}
