//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides (port)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults, so running without a file is valid
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve, ConfigError};
pub use schema::{AppConfig, LogFormat, ObservabilityConfig, StatusConfig, WatchConfig};
pub use validation::{validate_config, ValidationError};
