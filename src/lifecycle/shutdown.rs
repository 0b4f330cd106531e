//! Shutdown coordination.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::observability::metrics;

/// Why shutdown was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// SIGINT / Ctrl-C.
    Interrupt,
    /// SIGTERM.
    Terminate,
    /// Requested from inside the process.
    Requested,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Interrupt => "interrupt",
            StopReason::Terminate => "terminate",
            StopReason::Requested => "requested",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinator for cooperative shutdown.
///
/// Holds a single monotonic stop flag. The first call to [`Shutdown::trigger`]
/// sets it and logs the reason; later calls change nothing. Clones share the
/// same flag.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Subscribe to the stop flag.
    ///
    /// Subscribers created after the trigger observe it immediately.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Set the stop flag.
    ///
    /// Returns `true` for the call that actually flipped the flag.
    pub fn trigger(&self, reason: StopReason) -> bool {
        let first = self.tx.send_if_modified(|stopped| {
            if *stopped {
                false
            } else {
                *stopped = true;
                true
            }
        });

        if first {
            tracing::info!(reason = %reason, "Shutdown requested, stopping");
            metrics::record_shutdown(reason);
        }
        first
    }

    /// Whether shutdown has been triggered.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view of the stop flag handed to long-running tasks.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Non-blocking check.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until shutdown is triggered.
    ///
    /// Resolves immediately when the flag is already set, and also when the
    /// coordinator has been dropped.
    pub async fn recv(&mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
