//! Session config parsing and validation: YAML in, severity-tagged
//! diagnostics out. The builder and the runtime both go through here so a
//! config is judged identically at build time and at load time.

pub mod schema;
pub mod validation;

use schema::Config;
use serde_yaml::Error as YamlError;
use thiserror::Error;

pub use validation::{Location, Severity, ValidationIssue, validate_config};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Parse(#[from] YamlError),
}

pub fn parse_config_str(src: &str) -> Result<Config, ConfigError> {
    let config = serde_yaml::from_str::<Config>(src)?;
    Ok(config)
}

/// Parse-then-validate convenience for callers that only want diagnostics.
pub fn check_config_str(src: &str) -> Result<Vec<ValidationIssue>, ConfigError> {
    let config = parse_config_str(src)?;
    Ok(validate_config(&config, src))
}
