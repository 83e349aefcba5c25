//! Persistence contract consumed by the reorder engine
//!
//! The engine never talks to a database directly. It asks a store for the
//! items of a container (a playlist, the feed) when loading and hands back
//! the new identifier order after a reorder.

use crate::error::{DeckError, Result};
use crate::item::Identify;
use std::collections::HashMap;
use tracing::debug;

pub trait OrderStore<T> {
    /// Items of `container` in their stored order
    fn fetch_all(&self, container: &str) -> Result<Vec<T>>;

    /// Replace the stored order of `container`
    fn persist_order(&mut self, container: &str, ordered_ids: &[String]) -> Result<()>;
}

/// In-process store keyed by container id
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    containers: HashMap<String, Vec<T>>,
}

impl<T: Identify + Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            containers: HashMap::new(),
        }
    }

    pub fn insert_container(&mut self, container: impl Into<String>, items: Vec<T>) {
        self.containers.insert(container.into(), items);
    }

    pub fn container_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.containers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl<T: Identify + Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Identify + Clone> OrderStore<T> for MemoryStore<T> {
    fn fetch_all(&self, container: &str) -> Result<Vec<T>> {
        self.containers
            .get(container)
            .cloned()
            .ok_or_else(|| DeckError::NotFound(format!("container {container}")))
    }

    fn persist_order(&mut self, container: &str, ordered_ids: &[String]) -> Result<()> {
        let items = self
            .containers
            .get_mut(container)
            .ok_or_else(|| DeckError::NotFound(format!("container {container}")))?;

        if ordered_ids.len() != items.len() {
            return Err(DeckError::Store(format!(
                "order for {container} has {} ids, container holds {}",
                ordered_ids.len(),
                items.len()
            )));
        }

        let reordered = {
            let mut by_id: HashMap<&str, &T> =
                items.iter().map(|item| (item.uid(), item)).collect();
            if by_id.len() != items.len() {
                return Err(DeckError::Store(format!(
                    "container {container} holds duplicate ids, its order cannot be persisted"
                )));
            }
            let mut reordered = Vec::with_capacity(ordered_ids.len());
            for id in ordered_ids {
                let item = by_id
                    .remove(id.as_str())
                    .ok_or_else(|| DeckError::Store(format!("unknown or repeated id {id}")))?;
                reordered.push(item.clone());
            }
            reordered
        };

        debug!("Persisted order of {} items for {}", reordered.len(), container);
        *items = reordered;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore<String> {
        let mut store = MemoryStore::new();
        store.insert_container("p1", vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        store
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_fetch_missing_container() {
        assert!(matches!(store().fetch_all("nope"), Err(DeckError::NotFound(_))));
    }

    #[test]
    fn test_persist_reorders() {
        let mut store = store();
        store.persist_order("p1", &ids(&["c", "a", "b"])).unwrap();
        assert_eq!(store.fetch_all("p1").unwrap(), ids(&["c", "a", "b"]));
    }

    #[test]
    fn test_persist_rejects_foreign_or_repeated_ids() {
        let mut store = store();
        assert!(store.persist_order("p1", &ids(&["a", "b"])).is_err());
        assert!(store.persist_order("p1", &ids(&["a", "a", "b"])).is_err());
        assert!(store.persist_order("p1", &ids(&["a", "b", "z"])).is_err());
        assert_eq!(store.fetch_all("p1").unwrap(), ids(&["a", "b", "c"]));
    }

    #[test]
    fn test_persist_reports_duplicate_ids_in_container() {
        let mut store = MemoryStore::new();
        store.insert_container("p2", ids(&["a", "b", "a"]));

        let result = store.persist_order("p2", &ids(&["b", "a", "a"]));
        match result {
            Err(DeckError::Store(message)) => assert!(message.contains("duplicate ids")),
            other => panic!("expected a store error, got {other:?}"),
        }
        assert_eq!(store.fetch_all("p2").unwrap(), ids(&["a", "b", "a"]));
    }
}
