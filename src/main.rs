//! Locutus
//!
//! Watches every local network interface and serves what it has seen over a
//! small templated HTTP dashboard.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                          LOCUTUS                             │
//!   │                                                              │
//!   │  ┌─────────┐   ┌──────────────┐   ┌──────────────────────┐   │
//!   │  │ network │──▶│  supervisor  │──▶│ watcher × N (1/iface)│   │
//!   │  │enumerate│   │  (barrier)   │   │  → LinkStore         │   │
//!   │  └────┬────┘   └──────────────┘   └──────────┬───────────┘   │
//!   │       │                                      │ reads         │
//!   │       ▼                                      ▼               │
//!   │  ┌──────────────────────────────────────────────────────┐    │
//!   │  │ status service: /assets/{type}/{file}, /{template}   │◀───┼── HTTP
//!   │  └──────────────────────────────────────────────────────┘    │
//!   │                                                              │
//!   │  lifecycle: signals → Shutdown (stop flag) → all tasks       │
//!   │             guarded tasks: panic → logged fatal exit         │
//!   └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use locutus::config::{resolve, ObservabilityConfig};
use locutus::lifecycle::{signals, startup, AppContext};
use locutus::network::SystemInterfaces;
use locutus::observability::{logging, metrics};
use locutus::store::{LinkStore, StoreSet};
use locutus::watch::LinkWatcher;

#[derive(Parser)]
#[command(name = "locutus")]
#[command(about = "Watch every network interface and serve a status dashboard", long_about = None)]
struct Cli {
    /// HTTP port (default 8001)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let ctx = AppContext::new();

    let config = match resolve(cli.config.as_deref(), cli.port) {
        Ok(config) => config,
        Err(e) => {
            // Nothing from the file can be trusted; log with the defaults.
            let _ = logging::init(&ObservabilityConfig::default());
            ctx.fatal(&e, "Invalid configuration");
            return;
        }
    };

    if let Err(e) = logging::init(&config.observability) {
        // A subscriber is already installed, so the event still lands.
        ctx.fatal(&e, "Failed to initialise logging");
        return;
    }
    tracing::info!("locutus v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        port = config.status.port,
        templates_dir = %config.status.templates_dir.display(),
        assets_dir = %config.status.assets_dir.display(),
        poll_interval_ms = config.watch.poll_interval_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validated above.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            if let Err(e) = metrics::init_metrics(addr) {
                tracing::error!(error = %e, "Failed to start metrics endpoint");
            }
        }
    }

    signals::spawn_listener(&ctx);

    let links = LinkStore::new();
    let stores = StoreSet::new().with(Arc::new(links.clone()));
    let watcher = Arc::new(LinkWatcher::new(
        SystemInterfaces,
        links,
        config.watch.poll_interval(),
    ));

    match startup::run(&ctx, &config, &SystemInterfaces, watcher, stores).await {
        Ok(report) => {
            tracing::info!(
                watchers = report.started,
                failed = report.failed + report.panicked,
                "Shutdown complete"
            );
        }
        Err(e) => ctx.fatal(&e, "Startup failed"),
    }
}
