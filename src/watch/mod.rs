//! Per-interface watch supervision.
//!
//! # Data Flow
//! ```text
//! Vec<InterfaceRecord>
//!     → supervisor.rs (one task per record, in OS order)
//!     → watcher.rs (Watcher::watch, runs until done or stop observed)
//!     → link.rs (built-in watcher: polls link state into LinkStore)
//! ```
//!
//! # Design Decisions
//! - A watcher's error or panic is logged with the interface name and
//!   isolated; siblings keep running
//! - No restarts, no forced cancellation
//! - The supervisor returns only when every watcher has returned

pub mod link;
pub mod supervisor;
pub mod watcher;

pub use link::LinkWatcher;
pub use supervisor::{SuperviseReport, Supervisor};
pub use watcher::{WatchError, Watcher};
