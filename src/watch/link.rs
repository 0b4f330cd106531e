//! Built-in link-state watcher.
//!
//! Polls the interface table on a fixed interval and records the watched
//! interface's up/running state into a [`LinkStore`].

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use crate::lifecycle::ShutdownSignal;
use crate::network::{InterfaceRecord, InterfaceSource};
use crate::store::LinkStore;
use crate::watch::watcher::{WatchError, Watcher};

pub struct LinkWatcher<S> {
    source: S,
    store: LinkStore,
    interval: Duration,
}

impl<S: InterfaceSource> LinkWatcher<S> {
    pub fn new(source: S, store: LinkStore, interval: Duration) -> Self {
        Self {
            source,
            store,
            interval,
        }
    }

    pub fn store(&self) -> &LinkStore {
        &self.store
    }

    fn sample(&self, iface: &InterfaceRecord) -> Result<(), WatchError> {
        let current = self.source.enumerate()?;
        let record = current
            .iter()
            .find(|r| r.name == iface.name)
            .ok_or_else(|| WatchError::Vanished(iface.name.clone()))?;
        self.store.record(record);
        Ok(())
    }
}

impl<S: InterfaceSource + 'static> Watcher for LinkWatcher<S> {
    async fn watch(&self, iface: &InterfaceRecord, mut stop: ShutdownSignal) -> Result<(), WatchError> {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = stop.recv() => {
                    tracing::debug!(interface = %iface.name, "Stop observed, watcher exiting");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    self.sample(iface)?;
                }
            }
        }
    }
}
