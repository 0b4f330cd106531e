//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: &AppConfig → Result<(), Vec<ValidationError>>

use std::net::{IpAddr, SocketAddr};

use crate::config::schema::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("status.bind_host '{0}' is not an IP address")]
    BindHost(String),
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("watch.poll_interval_ms must be greater than zero")]
    PollInterval,
    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let status = &config.status;

    if status.bind_host.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::BindHost(status.bind_host.clone()));
    }
    if status.assets_dir.as_os_str().is_empty() {
        errors.push(ValidationError::Empty("status.assets_dir"));
    }
    if status.templates_dir.as_os_str().is_empty() {
        errors.push(ValidationError::Empty("status.templates_dir"));
    }
    if status.default_template.trim().is_empty() {
        errors.push(ValidationError::Empty("status.default_template"));
    }
    if config.watch.poll_interval_ms == 0 {
        errors.push(ValidationError::PollInterval);
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::MetricsAddress(obs.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
