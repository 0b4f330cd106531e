//! State stores rendered by the status service.
//!
//! Stores are owned by whatever writes to them (watchers); the status service
//! only reads snapshots. Each store is responsible for its own
//! synchronisation.

pub mod link;

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

pub use link::{LinkObservation, LinkStore};

/// A read-accessible store that can be embedded into a render context.
pub trait StateStore: Send + Sync {
    /// Key the snapshot is published under (`stores.<name>`).
    fn name(&self) -> &str;

    /// Point-in-time view of the store. Must be safe to call while other
    /// tasks are writing.
    fn snapshot(&self) -> Value;
}

/// Named collection of stores handed to the status service.
#[derive(Clone, Default)]
pub struct StoreSet {
    stores: Vec<Arc<dyn StateStore>>,
}

impl StoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a store. A store with the same name is replaced.
    pub fn with(mut self, store: Arc<dyn StateStore>) -> Self {
        self.stores.retain(|s| s.name() != store.name());
        self.stores.push(store);
        self
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Snapshot every store, keyed by name.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.stores
            .iter()
            .map(|s| (s.name().to_string(), s.snapshot()))
            .collect()
    }
}

impl fmt::Debug for StoreSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.stores.iter().map(|s| s.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(&'static str, Value);

    impl StateStore for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn snapshot(&self) -> Value {
            self.1.clone()
        }
    }

    #[test]
    fn test_snapshot_keys_by_name() {
        let set = StoreSet::new()
            .with(Arc::new(Fixed("requests", json!([1, 2]))))
            .with(Arc::new(Fixed("replies", json!({"a": 1}))));

        let snap = set.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap["requests"], json!([1, 2]));
        assert_eq!(snap["replies"]["a"], 1);
    }

    #[test]
    fn test_same_name_replaces() {
        let set = StoreSet::new()
            .with(Arc::new(Fixed("links", json!(1))))
            .with(Arc::new(Fixed("links", json!(2))));

        assert_eq!(set.len(), 1);
        assert_eq!(set.snapshot()["links"], json!(2));
    }
}
