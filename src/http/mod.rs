//! HTTP status service subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace layer)
//!     → route table:
//!         /assets/{type}/{file}  → handlers.rs serve_asset (ServeDir)
//!         / and /{template}      → handlers.rs render_*
//!     → context.rs (interfaces + store snapshots)
//!     → templates.rs (named template render, 500 on failure)
//! ```

pub mod context;
pub mod handlers;
pub mod server;
pub mod templates;

pub use context::RenderContext;
pub use server::{StatusError, StatusService, StatusState};
pub use templates::{RenderError, TemplateError, TemplateRegistry};
