//! Per-interface network watch supervisor with an HTTP status dashboard.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod network;
pub mod observability;
pub mod store;
pub mod watch;

pub use config::AppConfig;
pub use http::StatusService;
pub use lifecycle::{AppContext, Shutdown};
