//! Link-state store fed by the built-in link watcher.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;

use crate::network::InterfaceRecord;
use crate::store::StateStore;

/// What has been seen of one interface so far.
#[derive(Debug, Clone, Serialize)]
pub struct LinkObservation {
    pub name: String,
    pub up: bool,
    pub running: bool,
    /// Number of samples recorded.
    pub samples: u64,
    /// Number of up/running changes between consecutive samples.
    pub transitions: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// Concurrent map of interface name to latest observation.
#[derive(Debug, Clone, Default)]
pub struct LinkStore {
    inner: Arc<DashMap<String, LinkObservation>>,
}

impl LinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh sample of `record`.
    pub fn record(&self, record: &InterfaceRecord) {
        let now = Utc::now();
        let up = record.flags.up;
        let running = record.flags.running;

        self.inner
            .entry(record.name.clone())
            .and_modify(|obs| {
                if obs.up != up || obs.running != running {
                    obs.transitions += 1;
                    tracing::info!(
                        interface = %record.name,
                        up,
                        running,
                        "Link state changed"
                    );
                }
                obs.up = up;
                obs.running = running;
                obs.samples += 1;
                obs.last_seen = now;
            })
            .or_insert_with(|| LinkObservation {
                name: record.name.clone(),
                up,
                running,
                samples: 1,
                transitions: 0,
                first_seen: now,
                last_seen: now,
            });
    }

    pub fn get(&self, name: &str) -> Option<LinkObservation> {
        self.inner.get(name).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// All observations, sorted by interface name.
    pub fn all(&self) -> Vec<LinkObservation> {
        let mut all: Vec<LinkObservation> = self.inner.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

impl StateStore for LinkStore {
    fn name(&self) -> &str {
        "links"
    }

    fn snapshot(&self) -> Value {
        serde_json::to_value(self.all()).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::InterfaceFlags;

    fn record(name: &str, up: bool) -> InterfaceRecord {
        InterfaceRecord::new(
            1,
            name,
            InterfaceFlags {
                up,
                running: up,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_record_counts_samples_and_transitions() {
        let store = LinkStore::new();
        store.record(&record("eth0", true));
        store.record(&record("eth0", true));
        store.record(&record("eth0", false));
        store.record(&record("eth0", true));

        let obs = store.get("eth0").unwrap();
        assert_eq!(obs.samples, 4);
        assert_eq!(obs.transitions, 2);
        assert!(obs.up);
        assert!(obs.last_seen >= obs.first_seen);
    }

    #[test]
    fn test_snapshot_sorted_by_name() {
        let store = LinkStore::new();
        store.record(&record("wlan0", true));
        store.record(&record("eth0", false));
        store.record(&record("lo", true));

        let snap = store.snapshot();
        let names: Vec<&str> = snap
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["eth0", "lo", "wlan0"]);
        assert_eq!(store.name(), "links");
    }

    #[test]
    fn test_clones_share_state() {
        let store = LinkStore::new();
        let writer = store.clone();
        writer.record(&record("eth0", true));
        assert_eq!(store.len(), 1);
    }
}
