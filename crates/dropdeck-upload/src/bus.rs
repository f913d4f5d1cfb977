//! Upload event broadcasting for host listeners.
//!
//! Fan-out delivery of the three lifecycle notifications to any number of
//! ancestor observers. Hosts that want a different transport (DOM custom
//! events, SSE, …) implement `UploadEventEmitterPort` themselves instead.

use tokio::sync::broadcast;

use dropdeck_core::ports::UploadEventEmitterPort;
use dropdeck_core::upload::UploadEvent;

/// Broadcast channel capacity for upload events
const CHANNEL_CAPACITY: usize = 64;

/// Broadcaster for upload lifecycle events.
///
/// Clones share the underlying channel, so a clone handed to the manager
/// and a clone kept by the host feed the same subscribers.
#[derive(Clone)]
pub struct UploadEventBus {
    sender: broadcast::Sender<UploadEvent>,
}

impl UploadEventBus {
    /// Create a new bus.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to upload events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.sender.subscribe()
    }

    /// Get number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for UploadEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadEventEmitterPort for UploadEventBus {
    fn emit(&self, event: UploadEvent) {
        // Only log and send if there are receivers (avoid spam when no
        // listener is attached; delivery is fire-and-forget either way).
        if self.sender.receiver_count() > 0 {
            tracing::debug!(?event, "Broadcasting upload event");
            let _ = self.sender.send(event);
        }
    }

    fn clone_box(&self) -> Box<dyn UploadEventEmitterPort> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropdeck_core::upload::UploadId;

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let bus = UploadEventBus::new();
        let mut rx = bus.subscribe();

        let id = UploadId::generate();
        bus.emit(UploadEvent::completed(id));

        assert_eq!(rx.recv().await.unwrap(), UploadEvent::completed(id));
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_silent() {
        let bus = UploadEventBus::new();
        assert_eq!(bus.subscriber_count(), 0);

        // Should not panic or error
        bus.emit(UploadEvent::completed(UploadId::generate()));
    }

    #[tokio::test]
    async fn test_all_subscribers_receive() {
        let bus = UploadEventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        let id = UploadId::generate();
        bus.emit(UploadEvent::removed(id, "a.txt", true));

        assert_eq!(first.recv().await.unwrap().id(), id);
        assert_eq!(second.recv().await.unwrap().id(), id);
    }

    #[tokio::test]
    async fn test_clones_share_the_channel() {
        let bus = UploadEventBus::new();
        let mut rx = bus.subscribe();

        let clone = bus.clone();
        let id = UploadId::generate();
        clone.emit(UploadEvent::completed(id));

        assert_eq!(rx.recv().await.unwrap().id(), id);
    }
}
