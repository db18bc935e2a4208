//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::compression::CodecError;
use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::routing::RouteConfigError;

/// Error type for configuration loading and generation building.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Route file error: {0}")]
    RouteJson(#[from] serde_json::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("Route error: {0}")]
    Route(#[from] RouteConfigError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// A relative `route_file` is resolved against the config file's directory.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ProxyConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    if let (Some(route_file), Some(dir)) = (config.route_file.as_mut(), path.parent()) {
        if route_file.is_relative() {
            *route_file = dir.join(&*route_file);
        }
    }

    tracing::debug!(
        path = %path.display(),
        destinations = config.destinations.len(),
        codecs = config.codecs.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// The route tree of `config`, reading `route_file` if needed.
pub fn load_route(config: &ProxyConfig) -> Result<serde_json::Value, ConfigError> {
    match (&config.route, &config.route_file) {
        (Some(route), _) => Ok(route.clone()),
        (None, Some(path)) => {
            let content = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        }
        (None, None) => Err(ConfigError::Validation(vec![ValidationError::MissingRoute])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_resolves_route_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("routes.json"), r#"["DestinationRoute|a", "NullRoute"]"#)
            .unwrap();
        let config_path = dir.path().join("proxy.toml");
        let mut file = fs::File::create(&config_path).unwrap();
        writeln!(file, "route_file = \"routes.json\"\n[[destinations]]\nname = \"a\"").unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.route_file.as_deref(), Some(dir.path().join("routes.json").as_path()));

        let route = load_route(&config).unwrap();
        assert_eq!(route[0], "DestinationRoute|a");
    }

    #[test]
    fn test_load_config_reports_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("proxy.toml");
        fs::write(&config_path, "[[destinations]]\nname = \"\"\n").unwrap();

        let err = load_config(&config_path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: destination name must not be empty, no route configured, set route or route_file"
        );
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("proxy.toml");
        fs::write(&config_path, "host_id = \"not a number\"\n").unwrap();

        assert!(matches!(load_config(&config_path), Err(ConfigError::Parse(_))));
    }
}
