//! Configuration management for the flavor plugin server
//!
//! Settings are resolved from, in order of priority:
//! 1. Environment variables
//! 2. Configuration file (TOML format)
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration struct for the plugin server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlavorServerConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name the plugin is registered under
    pub name: String,
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for log files; file logging is off when unset
    pub log_dir: Option<PathBuf>,
    /// Use JSON formatting on the console
    pub json_format: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "flavor-vanilla".to_string(),
            host: "127.0.0.1".to_string(),
            port: 24864,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            json_format: false,
        }
    }
}

impl FlavorServerConfig {
    /// Load configuration from the standard file locations and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("VANILLA_FLAVOR_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/vanilla-flavor/config.toml")),
            Some(PathBuf::from("./vanilla-flavor.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("VANILLA_FLAVOR_NAME") {
            self.server.name = name;
        }
        if let Some(host) = lookup("VANILLA_FLAVOR_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("VANILLA_FLAVOR_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Some(level) = lookup("VANILLA_FLAVOR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(dir) = lookup("VANILLA_FLAVOR_LOG_DIR") {
            self.logging.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(json) = lookup("VANILLA_FLAVOR_LOG_JSON") {
            self.logging.json_format = json.parse().unwrap_or(false);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::Invalid("Plugin name cannot be empty".to_string()));
        }

        if self.server.port == 0 {
            return Err(ConfigError::Invalid("Port cannot be 0".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(PathBuf, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
