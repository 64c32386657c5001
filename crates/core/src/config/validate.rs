use super::{types::Config, ConfigError};

/// Validate a loaded configuration before anything is built from it.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.probe.concurrency == 0 {
        return Err(ConfigError::Invalid(
            "probe.concurrency must be at least 1".to_string(),
        ));
    }
    if config.probe.connect_timeout_ms == 0 {
        return Err(ConfigError::Invalid(
            "probe.connect_timeout_ms must be at least 1".to_string(),
        ));
    }
    if config.fetch.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "fetch.timeout_secs must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = Config::default();
        config.probe.concurrency = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_fetch_timeout_rejected() {
        let mut config = Config::default();
        config.fetch.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
