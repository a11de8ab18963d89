use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one worker
/// - `max_attempts`, when set, allows at least one attempt
/// - Extension list is non-empty and every entry starts with `.`
/// - Copy buffer is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.pool.worker_count == 0 {
        return Err(ConfigError::ValidationError(
            "pool.worker_count cannot be 0".to_string(),
        ));
    }

    if config.pool.max_attempts == Some(0) {
        return Err(ConfigError::ValidationError(
            "pool.max_attempts cannot be 0".to_string(),
        ));
    }

    if config.scan.extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "scan.extensions cannot be empty".to_string(),
        ));
    }

    if let Some(ext) = config
        .scan
        .extensions
        .iter()
        .find(|e| !e.starts_with('.') || e.len() < 2)
    {
        return Err(ConfigError::ValidationError(format!(
            "scan.extensions entry {:?} must look like \".jpg\"",
            ext
        )));
    }

    if config.collect.mover.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "collect.buffer_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(config: &Config) {
        let result = validate_config(config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_workers_fails() {
        let mut config = Config::default();
        config.pool.worker_count = 0;
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_zero_attempts_fails() {
        let mut config = Config::default();
        config.pool.max_attempts = Some(0);
        assert_invalid(&config);

        config.pool.max_attempts = Some(1);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_extensions() {
        let mut config = Config::default();
        config.scan.extensions.clear();
        assert_invalid(&config);

        config.scan.extensions = vec!["jpg".to_string()];
        assert_invalid(&config);

        config.scan.extensions = vec![".".to_string()];
        assert_invalid(&config);
    }

    #[test]
    fn test_validate_zero_buffer_fails() {
        let mut config = Config::default();
        config.collect.mover.buffer_size = 0;
        assert_invalid(&config);
    }
}
