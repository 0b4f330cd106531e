//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a configuration from a TOML file. Validation is left to the caller,
/// since CLI overrides are applied afterwards.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Build the effective configuration: the file (or defaults when no path is
/// given), then the port override, then validation.
pub fn resolve(path: Option<&Path>, port: Option<u16>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(port) = port {
        config.status.port = port;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(
            r#"
            [status]
            port = 9000

            [observability]
            log_format = "json"
            "#,
        );

        let config = resolve(Some(file.path()), None).unwrap();
        assert_eq!(config.status.port, 9000);
        assert_eq!(config.status.default_template, "interfaces.html");
        assert_eq!(config.watch.poll_interval_ms, 1000);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_parse_error() {
        let file = write_config("[status\nport = ");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validation_errors_are_reported_together() {
        let file = write_config(
            r#"
            [status]
            bind_host = "not-an-ip"
            default_template = ""

            [watch]
            poll_interval_ms = 0
            "#,
        );

        match resolve(Some(file.path()), None) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_without_file_uses_defaults() {
        let config = resolve(None, None).unwrap();
        assert_eq!(config.status.port, crate::config::schema::DEFAULT_PORT);
        assert_eq!(config.status.bind_host, "0.0.0.0");
    }

    #[test]
    fn test_port_override_wins_over_file() {
        let file = write_config("[status]\nport = 9000\n");
        let config = resolve(Some(file.path()), Some(8123)).unwrap();
        assert_eq!(config.status.port, 8123);
    }

    #[test]
    fn test_override_is_validated_with_file() {
        let file = write_config("[watch]\npoll_interval_ms = 0\n");
        let err = resolve(Some(file.path()), Some(8123)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors == &[ValidationError::PollInterval]));
        assert!(err.to_string().contains("poll_interval_ms"));
    }
}
