//! The per-interface watcher contract.

use std::future::Future;

use crate::lifecycle::ShutdownSignal;
use crate::network::{EnumerationError, InterfaceRecord};

/// Error type for a single watcher run.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The interface is no longer present.
    #[error("interface {0} disappeared")]
    Vanished(String),
    /// Re-reading interface state failed.
    #[error(transparent)]
    Enumeration(#[from] EnumerationError),
    #[error("{0}")]
    Other(String),
}

/// Monitors one interface.
///
/// `watch` may run indefinitely. It is expected to return once `stop` is
/// triggered; nothing forces it to.
pub trait Watcher: Send + Sync + 'static {
    fn watch(
        &self,
        iface: &InterfaceRecord,
        stop: ShutdownSignal,
    ) -> impl Future<Output = Result<(), WatchError>> + Send;
}
