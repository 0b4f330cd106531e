//! HTTP status service setup.
//!
//! # Responsibilities
//! - Build the Axum router (route table) once
//! - Wire up middleware (tracing, request ID)
//! - Bind to the configured port and serve until shutdown
//! - Report the listener's terminal result on a one-shot channel

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::StatusConfig;
use crate::http::handlers::{render_default, render_named, serve_asset};
use crate::http::templates::TemplateRegistry;
use crate::lifecycle::panic::spawn_guarded;
use crate::lifecycle::{AppContext, ShutdownSignal};
use crate::network::InterfaceSnapshot;
use crate::store::StoreSet;

/// Error type for the status listener.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("failed to bind status listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("status listener failed: {0}")]
    Serve(#[source] std::io::Error),
}

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct StatusState {
    pub interfaces: InterfaceSnapshot,
    pub templates: Arc<TemplateRegistry>,
    pub stores: StoreSet,
    pub assets: ServeDir,
}

/// HTTP dashboard over the interface list and registered stores.
pub struct StatusService {
    config: StatusConfig,
    router: Router,
}

impl StatusService {
    /// Build the route table and shared state.
    pub fn new(
        config: StatusConfig,
        interfaces: InterfaceSnapshot,
        templates: TemplateRegistry,
        stores: StoreSet,
    ) -> Self {
        let state = StatusState {
            interfaces,
            templates: Arc::new(templates),
            stores,
            assets: ServeDir::new(&config.assets_dir),
        };
        let router = build_router(state);
        Self { config, router }
    }

    /// Convenience constructor that loads templates from the configured
    /// directory.
    pub fn from_config(
        config: StatusConfig,
        interfaces: InterfaceSnapshot,
        stores: StoreSet,
    ) -> Result<Self, crate::http::templates::TemplateError> {
        let templates = TemplateRegistry::load(&config.templates_dir, &config.default_template)?;
        Ok(Self::new(config, interfaces, templates, stores))
    }

    /// The route table, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on an already-bound listener until `stop` fires.
    pub async fn serve(self, listener: TcpListener, mut stop: ShutdownSignal) -> Result<(), StatusError> {
        let addr = listener.local_addr().map_err(StatusError::Serve)?;
        tracing::info!(address = %addr, "HTTP listen and serve");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { stop.recv().await })
            .await
            .map_err(StatusError::Serve)?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Bind `bind_host:port` and serve on a guarded task.
    ///
    /// The receiver yields the listener's terminal result: `Ok` after a
    /// graceful stop, `Err` if binding or serving failed.
    pub fn start(self, ctx: &AppContext) -> oneshot::Receiver<Result<(), StatusError>> {
        let (tx, rx) = oneshot::channel();
        let stop = ctx.stop_signal();
        let host = self.config.bind_host.clone();
        let port = self.config.port;

        spawn_guarded(ctx, "status-service", async move {
            let result = match TcpListener::bind((host.as_str(), port)).await {
                Ok(listener) => self.serve(listener, stop).await,
                Err(source) => Err(StatusError::Bind {
                    addr: format!("{host}:{port}"),
                    source,
                }),
            };
            let _ = tx.send(result);
        });

        rx
    }
}

/// Build the Axum router with its middleware layers.
fn build_router(state: StatusState) -> Router {
    Router::new()
        .route("/assets/{type}/{file}", get(serve_asset))
        .route("/", get(render_default))
        .route("/{template}", get(render_named))
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
