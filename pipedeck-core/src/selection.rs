//! Observable selection mirror
//!
//! The reorder controller owns the authoritative selection and publishes a
//! copy here after every change. Other parts of the application (tag menus,
//! toolbars, a UI layer on another task) subscribe and always see a whole
//! set, never a half-applied edit.

use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::watch;

/// Identifiers of the currently selected items
pub type Selection = BTreeSet<String>;

/// Shared, observable cell holding the latest published [`Selection`]
#[derive(Debug, Clone)]
pub struct SelectionCell {
    sender: Arc<watch::Sender<Selection>>,
}

impl SelectionCell {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Selection::new());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replace the published selection.
    ///
    /// Succeeds with or without subscribers.
    pub fn publish(&self, selection: Selection) {
        self.sender.send_replace(selection);
    }

    /// Snapshot of the latest published selection
    pub fn get(&self) -> Selection {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Selection> {
        self.sender.subscribe()
    }
}

impl Default for SelectionCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let cell = SelectionCell::new();
        cell.publish(Selection::from(["a".to_string()]));
        assert!(cell.get().contains("a"));
    }

    #[test]
    fn test_clones_share_state() {
        let cell = SelectionCell::new();
        let mirror = cell.clone();
        cell.publish(Selection::from(["x".to_string(), "y".to_string()]));
        assert_eq!(mirror.get().len(), 2);
    }

    #[tokio::test]
    async fn test_subscriber_sees_latest() {
        let cell = SelectionCell::new();
        let mut receiver = cell.subscribe();

        cell.publish(Selection::from(["1".to_string()]));
        cell.publish(Selection::from(["2".to_string()]));

        receiver.changed().await.unwrap();
        let seen = receiver.borrow_and_update().clone();
        assert_eq!(seen, Selection::from(["2".to_string()]));
    }
}
