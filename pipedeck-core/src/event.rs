use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events emitted by the reorder engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // Selection events
    SelectionChanged { count: usize },

    // Order events
    OrderChanged { moved: usize, to: usize },
    ItemsLoaded { container: String, count: usize },

    // Persistence events
    OrderPersisted { container: String },
    PersistFailed { container: String, reason: String },

    // Tag events
    TagApplied { tag: Option<String>, count: usize },
}

/// Central event bus
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    pub fn emit(&self, event: Event) {
        // Ignore errors - means no subscribers
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new();
        bus.emit(Event::SelectionChanged { count: 1 });
    }

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let bus = EventBus::new();
        let mut receiver = bus.subscribe();

        bus.emit(Event::OrderChanged { moved: 2, to: 3 });
        bus.emit(Event::OrderPersisted {
            container: "7".to_string(),
        });

        assert_eq!(
            receiver.recv().await.unwrap(),
            Event::OrderChanged { moved: 2, to: 3 }
        );
        assert_eq!(
            receiver.recv().await.unwrap(),
            Event::OrderPersisted {
                container: "7".to_string()
            }
        );
    }
}
