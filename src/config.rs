use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::commands::{DEFAULT_PREFIX, PermissionLevel};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Namespace for every host identifier (`<prefix>:<name>`)
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    /// Permission level of the console player in the demo
    #[serde(default)]
    pub permission: PermissionLevel,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            log_filter: None,
            permission: PermissionLevel::Any,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON in config: {0}")]
    InvalidJson(String),
    #[error("Invalid prefix {0:?}: must be non-empty without ':' or whitespace")]
    InvalidPrefix(String),
    #[error("IO error reading config: {0}")]
    IoError(#[from] std::io::Error),
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join("ccm.json"))
}

/// Load `~/.config/ccm.json`, falling back to defaults when it does not exist.
pub fn load_config() -> Result<Config, ConfigError> {
    match config_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config =
        serde_json::from_str(content).map_err(|e| ConfigError::InvalidJson(e.to_string()))?;
    validate_prefix(&config.prefix)?;
    Ok(config)
}

pub fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() || prefix.contains(':') || prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

impl Config {
    pub fn set_prefix(&mut self, prefix: &str) -> Result<(), ConfigError> {
        validate_prefix(prefix)?;
        self.prefix = prefix.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_config() {
        let json = r#"{
            "prefix": "mc",
            "log_filter": "ccm=debug",
            "permission": "Admin"
        }"#;

        let config = parse_config(json).unwrap();
        assert_eq!(config.prefix, "mc");
        assert_eq!(config.log_filter.as_deref(), Some("ccm=debug"));
        assert_eq!(config.permission, PermissionLevel::Admin);
    }

    #[test]
    fn empty_object_uses_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.prefix, "ccm");
    }

    #[test]
    fn unknown_permission_is_invalid_json() {
        let err = parse_config(r#"{ "permission": "Root" }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidJson(ref msg) if msg.contains("Invalid permission level: Root")
        ));
    }

    #[test]
    fn namespaced_prefix_is_rejected() {
        let err = parse_config(r#"{ "prefix": "a:b" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPrefix(ref p) if p == "a:b"));

        let mut config = Config::default();
        assert!(config.set_prefix("with space").is_err());
        assert!(config.set_prefix("").is_err());
        assert!(config.set_prefix("demo").is_ok());
        assert_eq!(config.prefix, "demo");
    }

    #[test]
    fn round_trips_through_json() {
        let config = Config {
            prefix: "x".to_string(),
            log_filter: None,
            permission: PermissionLevel::Host,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"prefix":"x","permission":"Host"}"#);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config_from(Path::new("/definitely/not/here/ccm.json")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
