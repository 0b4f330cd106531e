//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Enumerate interfaces → Load templates → Start status service
//!     → Supervise one watcher per interface → Wait for all watchers
//!
//! Shutdown (shutdown.rs):
//!     trigger(reason) → stop flag set once → every ShutdownSignal observes it
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger (repeats are no-ops)
//!
//! Panic containment (panic.rs):
//!     guarded task panics → logged with payload → AppContext::fatal
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Shutdown is advisory: watchers observe the flag, nothing is aborted
//! - Process-wide state lives in an explicit `AppContext`, not globals

pub mod context;
pub mod panic;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use context::AppContext;
pub use shutdown::{Shutdown, ShutdownSignal, StopReason};
