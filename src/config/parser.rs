use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use pagesweep::config::load_config;
///
/// let config = load_config(Path::new("pagesweep.toml")).unwrap();
/// println!("Workers: {}", config.queue.workers);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[discovery]
max-crawl-depth = 2
max-urls = 5
crawl-delay-ms = 100
request-timeout-secs = 8
probe-timeout-secs = 4

[queue]
workers = 4
max-attempts = 2
backoff-base-ms = 500

[user-agent]
scanner-name = "TestSweep"
scanner-version = "0.1"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
database-path = "./test.db"
"#;
        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.discovery.max_crawl_depth, 2);
        assert_eq!(config.discovery.max_urls, 5);
        assert_eq!(config.queue.workers, 4);
        assert_eq!(config.queue.max_attempts, 2);
        assert_eq!(config.user_agent.scanner_name, "TestSweep");
        assert_eq!(config.output.database_path, "./test.db");
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.discovery.max_crawl_depth, 3);
        assert_eq!(config.discovery.max_urls, 10);
        assert_eq!(config.discovery.crawl_delay_ms, 200);
        assert_eq!(config.queue.workers, 2);
        assert_eq!(config.queue.max_attempts, 3);
        assert_eq!(config.queue.backoff_base_ms, 1000);
    }

    #[test]
    fn test_invalid_toml() {
        let file = create_temp_config("[discovery\nmax-urls = ");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let file = create_temp_config("[discovery]\nmax-depht = 3\n");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Path::new("/nonexistent/pagesweep.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
