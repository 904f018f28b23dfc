//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{HeraldConfig, LogOutput, LoggingConfig, RestConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &HeraldConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    if config.rest.enabled {
        validate_rest_config(&config.rest)?;
    }
    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> ConfigResult<()> {
    if config.output == LogOutput::File
        && config
            .file_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
    {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    for module in config.filters.keys() {
        if module.trim().is_empty() {
            return Err(ConfigError::validation("Log filter module name is empty"));
        }
    }

    Ok(())
}

fn validate_rest_config(config: &RestConfig) -> ConfigResult<()> {
    if config.host.is_empty() {
        return Err(ConfigError::missing_field("rest.host"));
    }
    validate_port(config.port)?;
    validate_path(&config.path)?;
    if config.message.is_empty() {
        return Err(ConfigError::validation("Broadcast message must not be empty"));
    }
    Ok(())
}

/// Validates a port number.
fn validate_port(port: u16) -> ConfigResult<()> {
    if port == 0 {
        return Err(ConfigError::InvalidPort(port));
    }
    Ok(())
}

/// Validates a route path.
fn validate_path(path: &str) -> ConfigResult<()> {
    if path.is_empty() {
        return Err(ConfigError::missing_field("rest.path"));
    }
    if !path.starts_with('/') {
        return Err(ConfigError::validation("Path must start with '/'"));
    }
    // the broadcast route is static
    if path.contains(['{', '}', '*']) || path.split('/').any(|seg| seg.starts_with(':')) {
        return Err(ConfigError::validation(format!(
            "Path '{path}' must be a static route without captures or wildcards"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&HeraldConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_rest_path() {
        let mut config = HeraldConfig::default();
        config.rest.path = "ping".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));

        config.rest.path.clear();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_route_patterns() {
        for path in ["/{broken", "/ping}", "/{id}", "/*rest", "/:id", "/a/:b"] {
            let mut config = HeraldConfig::default();
            config.rest.path = path.to_string();
            assert!(
                matches!(
                    validate_config(&config),
                    Err(ConfigError::ValidationError { .. })
                ),
                "{path} passed validation"
            );
        }

        let mut config = HeraldConfig::default();
        config.rest.path = "/api/ping-all".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_and_message() {
        let mut config = HeraldConfig::default();
        config.rest.port = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidPort(0))
        ));

        let mut config = HeraldConfig::default();
        config.rest.message.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_disabled_rest_is_not_validated() {
        let mut config = HeraldConfig::default();
        config.rest.enabled = false;
        config.rest.port = 0;
        assert!(validate_config(&config).is_ok());
    }
}
