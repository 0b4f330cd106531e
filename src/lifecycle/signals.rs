//! OS signal handling.
//!
//! # Responsibilities
//! - Register handlers for SIGINT and SIGTERM
//! - Translate each delivery into `Shutdown::trigger`
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Handlers are installed before the listener task starts, so a signal
//!   raised right after `spawn_listener` is never lost
//! - Repeated signals are ignored once shutdown is in progress

use crate::lifecycle::context::AppContext;
use crate::lifecycle::panic::spawn_guarded;
use crate::lifecycle::shutdown::{Shutdown, StopReason};

/// Installed SIGINT and SIGTERM streams.
#[cfg(unix)]
pub struct Signals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    /// Register the handlers. Must be called from inside a tokio runtime.
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Forward deliveries to `shutdown` until the signal streams close.
    pub async fn listen(mut self, shutdown: Shutdown) {
        loop {
            let reason = tokio::select! {
                Some(()) = self.interrupt.recv() => StopReason::Interrupt,
                Some(()) = self.terminate.recv() => StopReason::Terminate,
                else => return,
            };
            deliver(&shutdown, reason);
        }
    }
}

/// Ctrl-C only.
#[cfg(not(unix))]
pub struct Signals;

#[cfg(not(unix))]
impl Signals {
    pub fn install() -> std::io::Result<Self> {
        Ok(Self)
    }

    pub async fn listen(self, shutdown: Shutdown) {
        while tokio::signal::ctrl_c().await.is_ok() {
            deliver(&shutdown, StopReason::Interrupt);
        }
    }
}

fn deliver(shutdown: &Shutdown, reason: StopReason) {
    if shutdown.trigger(reason) {
        tracing::info!(signal = %reason, "Signalled");
    } else {
        tracing::debug!(signal = %reason, "Shutdown already in progress, ignoring signal");
    }
}

/// Install the handlers and spawn the listener on a guarded task.
pub fn spawn_listener(ctx: &AppContext) {
    let signals = match Signals::install() {
        Ok(signals) => signals,
        Err(e) => {
            // The default disposition still terminates the process.
            tracing::warn!(error = %e, "Failed to install signal handlers");
            return;
        }
    };

    let shutdown = ctx.shutdown().clone();
    spawn_guarded(ctx, "signal-listener", signals.listen(shutdown));
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use nix::sys::signal::{raise, Signal};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    async fn wait_for_log(capture: &Capture, needle: &str) {
        for _ in 0..200 {
            if capture.contents().contains(needle) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("log line {needle:?} never appeared:\n{}", capture.contents());
    }

    #[tokio::test]
    async fn test_signals_trigger_shutdown_once() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let shutdown = Shutdown::new();
        let mut stop = shutdown.subscribe();
        let signals = Signals::install().unwrap();
        let listener = tokio::spawn(signals.listen(shutdown.clone()));

        raise(Signal::SIGINT).unwrap();
        tokio::time::timeout(Duration::from_secs(2), stop.recv())
            .await
            .expect("SIGINT did not trigger shutdown");
        assert!(shutdown.is_triggered());

        raise(Signal::SIGTERM).unwrap();
        wait_for_log(&capture, "Shutdown already in progress").await;

        let logs = capture.contents();
        assert_eq!(logs.matches("Shutdown requested").count(), 1);
        assert!(logs.contains("reason=interrupt"));
        assert_eq!(logs.matches("Signalled").count(), 1);
        assert!(logs.contains("signal=terminate"));

        listener.abort();
    }
}
