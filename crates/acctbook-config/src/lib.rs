//! Configuration management for acctbook
//!
//! This module handles loading, validation, and management of
//! acctbook configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{ConfigError, ConfigResult};

/// Environment variable overriding `store.url`
pub const ENV_STORE_URL: &str = "ACCTBOOK_STORE_URL";
/// Environment variable overriding `store.api_key`
pub const ENV_STORE_KEY: &str = "ACCTBOOK_STORE_KEY";

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

/// Which item store the server talks to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process store, contents are lost on restart
    Memory,
    /// Hosted PostgREST-style table API
    Rest,
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::Memory
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "rest" => Ok(StoreBackend::Rest),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Rest => write!(f, "rest"),
        }
    }
}

/// External item store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Base URL of the hosted backend (e.g. "https://xyz.supabase.co")
    #[serde(default)]
    pub url: String,
    /// Public API key sent with every request
    #[serde(default)]
    pub api_key: String,
    /// Table holding the items
    #[serde(default = "default_table")]
    pub table: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: String::new(),
            api_key: String::new(),
            table: default_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// API key with everything but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        let count = self.api_key.chars().count();
        if count <= 4 {
            return "*".repeat(count);
        }
        let tail: String = self.api_key.chars().skip(count - 4).collect();
        format!("{}{}", "*".repeat(count - 4), tail)
    }
}

fn default_table() -> String {
    "items".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Items per page on the items list
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    5
}

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the browser preference
    System,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::System
    }
}

impl std::str::FromStr for Theme {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(format!("Invalid theme: {}", s)),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::System => write!(f, "system"),
        }
    }
}

/// Initial UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub sidebar_open: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            sidebar_open: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Symbol shown before amounts
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: default_currency_symbol(),
            decimal_places: default_decimal_places(),
        }
    }
}

fn default_currency_symbol() -> String {
    "€".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
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
    /// Item store settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// UI defaults
    #[serde(default)]
    pub ui: UiConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError,
        })?;

        let mut config = Self::from_yaml(&content)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from YAML text without validating it
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        serde_yaml::from_str(content).map_err(|_| ConfigError::InvalidYaml)
    }

    /// Override store credentials from the environment
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_STORE_URL).filter(|v| !v.is_empty()) {
            self.store.url = url;
        }
        if let Some(key) = lookup(ENV_STORE_KEY).filter(|v| !v.is_empty()) {
            self.store.api_key = key;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.pagination.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.page_size".to_string(),
                reason: "Page size must be greater than 0".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if self.store.backend == StoreBackend::Rest {
            if self.store.url.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "store.url".to_string(),
                });
            }
            if self.store.api_key.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "store.api_key".to_string(),
                });
            }
            if self.store.timeout_secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "store.timeout_secs".to_string(),
                    reason: "Timeout must be at least 1 second".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses_and_validates() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.pagination.page_size, 5);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.table, "items");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::from_yaml("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.pagination.page_size, 5);
        assert_eq!(config.ui.theme, Theme::System);
        assert!(config.ui.sidebar_open);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_invalid_yaml() {
        let result = Config::from_yaml("server: [unclosed");
        assert!(matches!(result, Err(ConfigError::InvalidYaml)));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.pagination.page_size = 0;
        match config.validate() {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "pagination.page_size"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rest_backend_requires_credentials() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Rest;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { ref field }) if field == "store.url"
        ));

        config.store.url = "https://example.supabase.co".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { ref field }) if field == "store.api_key"
        ));

        config.store.api_key = "anon-key".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(|key| match key {
            ENV_STORE_URL => Some("https://env.example".to_string()),
            ENV_STORE_KEY => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.store.url, "https://env.example");
        assert!(config.store.api_key.is_empty());
    }

    #[test]
    fn test_masked_api_key() {
        let mut store = StoreConfig::default();
        store.api_key = "abcdefgh1234".to_string();
        assert_eq!(store.masked_api_key(), "********1234");
        store.api_key = "abc".to_string();
        assert_eq!(store.masked_api_key(), "***");
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(Theme::Light.to_string(), "light");
        assert!("purple".parse::<Theme>().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(PathBuf::from("/nonexistent/acctbook.yaml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }
}
