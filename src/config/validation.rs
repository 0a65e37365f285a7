use crate::config::types::Config;
use crate::ConfigError;

/// Validates a loaded configuration
///
/// Checks that every limit is usable: at least one worker, a non-zero page
/// budget, at least one job attempt, and non-empty user agent identity fields.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.queue.workers == 0 {
        return Err(ConfigError::Validation(
            "queue.workers must be at least 1".to_string(),
        ));
    }

    if config.queue.max_attempts == 0 {
        return Err(ConfigError::Validation(
            "queue.max-attempts must be at least 1".to_string(),
        ));
    }

    if config.discovery.max_urls == 0 {
        return Err(ConfigError::Validation(
            "discovery.max-urls must be at least 1".to_string(),
        ));
    }

    if config.discovery.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "discovery.request-timeout-secs must be at least 1".to_string(),
        ));
    }

    if config.user_agent.scanner_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent.scanner-name must not be empty".to_string(),
        ));
    }

    if config.user_agent.contact_email.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent.contact-email must not be empty".to_string(),
        ));
    }

    if config.output.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output.database-path must not be empty".to_string(),
        ));
    }

    Ok(())
}
