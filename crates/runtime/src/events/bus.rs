//! Broadcast bus for authority outcomes.

use tokio::sync::broadcast;

use super::types::RelayEvent;
use crate::config::RuntimeConfig;

/// Fan-out of [`RelayEvent`]s to any number of observers.
///
/// Publishing never blocks; observers that fall behind lose the oldest events.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<RelayEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Capacity is clamped to `1..=RuntimeConfig::MAX_EVENT_BUFFER`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tx: broadcast::channel(capacity.clamp(1, RuntimeConfig::MAX_EVENT_BUFFER)).0,
        }
    }

    pub fn publish(&self, event: RelayEvent) {
        if self.tx.send(event).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!("no subscribers for relay events");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
