//! Configuration loading and validation
//!
//! Configuration is read from a TOML file with kebab-case keys. All fields
//! have defaults matching the politeness and concurrency limits the scanner
//! ships with, so a config file is optional.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{Config, DiscoveryConfig, OutputConfig, QueueConfig, UserAgentConfig};
pub use validation::validate;
