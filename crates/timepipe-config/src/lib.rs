//! Configuration management for timepipe
//!
//! This module handles loading, validation, and management of
//! timepipe configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

/// Environment variable overriding `source.local_url`
pub const ENV_LOCAL_SERVER_URL: &str = "TIMEPIPE_LOCAL_SERVER_URL";
/// Environment variable overriding `source.prod_url`
pub const ENV_PROD_SERVER_URL: &str = "TIMEPIPE_PROD_SERVER_URL";
/// Environment variable overriding `source.environment`
pub const ENV_ENVIRONMENT: &str = "TIMEPIPE_ENVIRONMENT";

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Where transaction records come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Remote transactions service over HTTP
    #[default]
    Http,
    /// Local JSON file holding an array of records
    File,
}

impl std::str::FromStr for SourceKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(SourceKind::Http),
            "file" => Ok(SourceKind::File),
            _ => Err(format!("Invalid source kind: {}", s)),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Http => write!(f, "http"),
            SourceKind::File => write!(f, "file"),
        }
    }
}

/// Deployment environment, picks which server URL is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Default for Environment {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source kind
    #[serde(default)]
    pub kind: SourceKind,
    /// Selects between `local_url` and `prod_url`
    #[serde(default)]
    pub environment: Environment,
    /// Transactions server used in development
    #[serde(default = "default_local_url")]
    pub local_url: String,
    /// Transactions server used in production
    #[serde(default)]
    pub prod_url: String,
    /// Path of the list endpoint, appended to the base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// JSON file read when `kind` is `file`
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,
    /// Upper bound for a single fetch
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            environment: Environment::default(),
            local_url: default_local_url(),
            prod_url: String::new(),
            endpoint: default_endpoint(),
            file_path: default_file_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_local_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_endpoint() -> String {
    "/api/transactions/list".to_string()
}

fn default_file_path() -> PathBuf {
    PathBuf::from("./data/transactions.json")
}

fn default_timeout_secs() -> u64 {
    10
}

impl SourceConfig {
    /// Base URL for the configured environment
    pub fn base_url(&self) -> &str {
        match self.environment {
            Environment::Development => &self.local_url,
            Environment::Production => &self.prod_url,
        }
    }

    /// Full URL of the transactions list endpoint
    pub fn transactions_url(&self) -> String {
        let base = self.base_url().trim_end_matches('/');
        if self.endpoint.starts_with('/') {
            format!("{}{}", base, self.endpoint)
        } else {
            format!("{}/{}", base, self.endpoint)
        }
    }
}

/// Display settings for the transactions table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Page heading
    #[serde(default = "default_title")]
    pub title: String,
    /// strftime pattern for the Created Date column
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Render created dates in the server's local zone instead of UTC
    #[serde(default = "default_true")]
    pub local_time: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            date_format: default_date_format(),
            local_time: true,
        }
    }
}

fn default_title() -> String {
    "Transactions Table".to_string()
}

fn default_date_format() -> String {
    "%-m/%-d/%Y, %-I:%M:%S %p".to_string()
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data source settings
    #[serde(default)]
    pub source: SourceConfig,
    /// Table display settings
    #[serde(default)]
    pub display: DisplayConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// A missing file yields the defaults; the caller decides whether to
    /// warn. Environment overrides are applied before validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|_| ConfigError::IoError {
                path: path.display().to_string(),
            })?;
            Self::from_yaml(&content)?
        } else {
            Config::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from YAML text without validating it
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })
    }

    /// Apply overrides looked up through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_LOCAL_SERVER_URL) {
            self.source.local_url = url;
        }
        if let Some(url) = lookup(ENV_PROD_SERVER_URL) {
            self.source.prod_url = url;
        }
        if let Some(env) = lookup(ENV_ENVIRONMENT) {
            self.source.environment = env.parse().map_err(|reason| ConfigError::InvalidValue {
                field: ENV_ENVIRONMENT.to_string(),
                reason,
            })?;
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.source.kind == SourceKind::Http && self.source.base_url().trim().is_empty() {
            let field = match self.source.environment {
                Environment::Development => "source.local_url",
                Environment::Production => "source.prod_url",
            };
            return Err(ConfigError::MissingField {
                field: field.to_string(),
            });
        }

        if self.source.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.timeout_secs".to_string(),
                reason: "Timeout must be at least one second".to_string(),
            });
        }

        if self.display.date_format.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "display.date_format".to_string(),
                reason: "Date format must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.source.kind, SourceKind::Http);
        assert_eq!(config.source.endpoint, "/api/transactions/list");
        assert_eq!(config.display.title, "Transactions Table");
        assert!(config.display.local_time);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_bundled_default_parses_and_validates() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        let mut config = config;
        config.source.environment = Environment::Development;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_follows_environment() {
        let mut source = SourceConfig {
            local_url: "http://localhost:5000".to_string(),
            prod_url: "https://api.example.com".to_string(),
            ..SourceConfig::default()
        };

        source.environment = Environment::Development;
        assert_eq!(source.base_url(), "http://localhost:5000");
        assert_eq!(
            source.transactions_url(),
            "http://localhost:5000/api/transactions/list"
        );

        source.environment = Environment::Production;
        assert_eq!(
            source.transactions_url(),
            "https://api.example.com/api/transactions/list"
        );
    }

    #[test]
    fn test_transactions_url_joins_slashes() {
        let source = SourceConfig {
            environment: Environment::Development,
            local_url: "http://localhost:5000/".to_string(),
            endpoint: "list".to_string(),
            ..SourceConfig::default()
        };
        assert_eq!(source.transactions_url(), "http://localhost:5000/list");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_PROD_SERVER_URL, "https://prod.example.com"),
            (ENV_ENVIRONMENT, "prod"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.source.environment, Environment::Production);
        assert_eq!(config.source.base_url(), "https://prod.example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_override_rejects_unknown_environment() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(|key| {
            (key == ENV_ENVIRONMENT).then(|| "staging".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_validate_missing_prod_url() {
        let mut config = Config::default();
        config.source.environment = Environment::Production;
        config.source.prod_url = String::new();

        match config.validate() {
            Err(ConfigError::MissingField { field }) => assert_eq!(field, "source.prod_url"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_file_source_ignores_urls() {
        let mut config = Config::default();
        config.source.kind = SourceKind::File;
        config.source.environment = Environment::Production;
        config.source.prod_url = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_port_and_timeout() {
        let mut config = Config::default();
        config.source.environment = Environment::Development;
        config.server.port = 0;
        assert!(config.validate().is_err());

        config.server.port = 8081;
        config.source.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_yaml() {
        let result = Config::from_yaml("server: [1, 2");
        assert!(matches!(result, Err(ConfigError::InvalidYaml { .. })));
    }

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("http".parse::<SourceKind>().unwrap(), SourceKind::Http);
        assert_eq!("FILE".parse::<SourceKind>().unwrap(), SourceKind::File);
        assert!("ftp".parse::<SourceKind>().is_err());
    }
}
