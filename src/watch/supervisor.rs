//! Interface watch supervisor.
//!
//! # Responsibilities
//! - Start exactly one watcher task per interface record
//! - Contain each watcher's error or panic to that watcher
//! - Block until every watcher has returned

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::lifecycle::panic::catch_panic;
use crate::lifecycle::ShutdownSignal;
use crate::network::InterfaceRecord;
use crate::observability::metrics;
use crate::watch::watcher::{WatchError, Watcher};

/// How a supervision round ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuperviseReport {
    pub started: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub panicked: usize,
}

impl SuperviseReport {
    pub fn finished(&self) -> usize {
        self.succeeded + self.failed + self.panicked
    }
}

enum Outcome {
    Succeeded,
    Failed(WatchError),
    Panicked(String),
}

/// Runs one `W` per interface.
pub struct Supervisor<W> {
    watcher: Arc<W>,
}

impl<W: Watcher> Supervisor<W> {
    pub fn new(watcher: Arc<W>) -> Self {
        Self { watcher }
    }

    /// Watch every interface and wait for all watchers to return.
    pub async fn supervise_all(
        &self,
        interfaces: &[InterfaceRecord],
        stop: &ShutdownSignal,
    ) -> SuperviseReport {
        let mut report = SuperviseReport::default();
        let mut tasks = JoinSet::new();

        for iface in interfaces {
            let watcher = Arc::clone(&self.watcher);
            let iface = iface.clone();
            let stop = stop.clone();

            tracing::info!(
                interface = %iface.name,
                index = iface.index,
                flags = %iface.flags,
                "Watching interface"
            );
            metrics::record_watch_started(&iface.name);

            tasks.spawn(async move {
                let outcome = match catch_panic(&iface.name, watcher.watch(&iface, stop)).await {
                    Ok(Ok(())) => Outcome::Succeeded,
                    Ok(Err(e)) => Outcome::Failed(e),
                    Err(panic) => Outcome::Panicked(panic.message),
                };
                (iface.name, outcome)
            });
            report.started += 1;
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Outcome::Succeeded)) => {
                    tracing::info!(interface = %name, "Watcher finished");
                    metrics::record_watch_finished(&name, "ok");
                    report.succeeded += 1;
                }
                Ok((name, Outcome::Failed(e))) => {
                    tracing::error!(interface = %name, error = %e, "Error watching interface");
                    metrics::record_watch_finished(&name, "error");
                    report.failed += 1;
                }
                Ok((name, Outcome::Panicked(message))) => {
                    tracing::error!(interface = %name, error = %message, "Watcher panicked");
                    metrics::record_watch_finished(&name, "panic");
                    report.panicked += 1;
                }
                // Tasks are never aborted, so this only happens if the
                // runtime is shutting down underneath us.
                Err(e) => {
                    tracing::error!(error = %e, "Watcher task did not complete");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            started = report.started,
            succeeded = report.succeeded,
            failed = report.failed,
            panicked = report.panicked,
            "All watchers finished"
        );
        report
    }
}
