//! Startup orchestration.
//!
//! # Responsibilities
//! - Enumerate interfaces (fatal on failure)
//! - Load templates and start the status service (fatal on failure)
//! - Supervise one watcher per interface and wait for all of them
//!
//! # Design Decisions
//! - Fail fast: any startup error is returned before a watcher starts
//! - The status service starts before watchers so the dashboard is up
//!   while they run

use std::sync::Arc;

use crate::config::AppConfig;
use crate::http::{StatusService, TemplateError};
use crate::lifecycle::context::AppContext;
use crate::lifecycle::panic::spawn_guarded;
use crate::network::{EnumerationError, InterfaceSnapshot, InterfaceSource};
use crate::store::StoreSet;
use crate::watch::{SuperviseReport, Supervisor, Watcher};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("error getting the list of interfaces: {0}")]
    Enumeration(#[from] EnumerationError),
    #[error("error loading templates: {0}")]
    Templates(#[from] TemplateError),
}

/// Run the whole process lifecycle and return once every watcher is done.
///
/// The status listener's terminal error is escalated through
/// [`AppContext::fatal`].
pub async fn run<S, W>(
    ctx: &AppContext,
    config: &AppConfig,
    source: &S,
    watcher: Arc<W>,
    stores: StoreSet,
) -> Result<SuperviseReport, StartupError>
where
    S: InterfaceSource + ?Sized,
    W: Watcher,
{
    let interfaces: InterfaceSnapshot = source.enumerate()?.into();
    tracing::info!(count = interfaces.len(), "Discovered network interfaces");

    let service = StatusService::from_config(config.status.clone(), interfaces.clone(), stores)?;
    let done = service.start(ctx);

    let monitor = ctx.clone();
    spawn_guarded(ctx, "status-monitor", async move {
        match done.await {
            Ok(Ok(())) => tracing::debug!("Status service exited"),
            Ok(Err(e)) => monitor.fatal(&e, "Error starting HTTP server"),
            // The sender only disappears when the guarded task panicked,
            // which has already been escalated.
            Err(_) => {}
        }
    });

    let report = Supervisor::new(watcher)
        .supervise_all(&interfaces, &ctx.stop_signal())
        .await;

    tracing::info!("Exited");
    Ok(report)
}
