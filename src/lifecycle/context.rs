//! Process-wide application context.

use std::fmt;
use std::sync::Arc;

use crate::lifecycle::shutdown::{Shutdown, ShutdownSignal};

/// Exit code used for every fatal stop.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Called with the exit code when the process must stop.
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

/// State shared by every component: the stop flag and the fatal-exit path.
///
/// Constructed once in `main` and cloned into each task.
#[derive(Clone)]
pub struct AppContext {
    shutdown: Shutdown,
    exit: ExitHook,
}

impl AppContext {
    /// Context whose fatal path terminates the process.
    pub fn new() -> Self {
        Self::with_exit_hook(Arc::new(|code| std::process::exit(code)))
    }

    /// Context with a custom fatal path. Used by tests to observe fatal stops.
    pub fn with_exit_hook(exit: ExitHook) -> Self {
        Self {
            shutdown: Shutdown::new(),
            exit,
        }
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    pub fn stop_signal(&self) -> ShutdownSignal {
        self.shutdown.subscribe()
    }

    /// Log a fatal error and stop the process.
    ///
    /// With the default hook this never returns.
    pub fn fatal(&self, error: &dyn fmt::Display, message: &str) {
        tracing::error!(fatal = true, error = %error, "{}", message);
        (self.exit)(FATAL_EXIT_CODE);
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("shutdown", &self.shutdown)
            .finish_non_exhaustive()
    }
}
