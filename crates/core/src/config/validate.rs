use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Gateway success rate is a probability
/// - Queue key and signing secret are non-empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&config.gateway.success_rate) {
        return Err(ConfigError::ValidationError(
            "gateway.success_rate must be between 0.0 and 1.0".to_string(),
        ));
    }

    if config.queue.key.is_empty() {
        return Err(ConfigError::ValidationError(
            "queue.key cannot be empty".to_string(),
        ));
    }

    if config.auth.secret.is_empty() {
        return Err(ConfigError::ValidationError(
            "auth.secret cannot be empty".to_string(),
        ));
    }

    Ok(())
}
