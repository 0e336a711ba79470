//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::{self, Environment};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// `production` or `local`; defaults to the compiled-in choice
    #[serde(default)]
    pub environment: Environment,

    /// Explicit base URL, overrides `environment`
    pub base_url: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Dedicated session validation endpoint, e.g. `/auth/validate`
    pub validate_path: Option<String>,

    /// Endpoint notified on logout
    pub logout_path: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            environment: Environment::compiled(),
            base_url: None,
            timeout_secs: default_timeout(),
            validate_path: None,
            logout_path: None,
        }
    }
}

impl ApiConfig {
    /// Resolved base URL
    pub fn base_url(&self) -> String {
        domain::resolve(self.environment, self.base_url.as_deref())
    }
}

/// Local session storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_path")]
    pub path: String,
}

fn default_session_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("userdesk").join("session.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./userdesk_session.json".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
        }
    }
}

impl SessionConfig {
    /// Session file path with a leading `~/` expanded
    pub fn resolved_path(&self) -> PathBuf {
        match (self.path.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.path),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("userdesk").join("config.toml")),
            Some(PathBuf::from("./userdesk.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable source
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(env) = var("USERDESK_ENV") {
            match env.parse() {
                Ok(env) => self.api.environment = env,
                Err(e) => tracing::warn!("Ignoring USERDESK_ENV: {}", e),
            }
        }
        if let Some(url) = var("USERDESK_API_URL") {
            self.api.base_url = Some(url);
        }
        if let Some(path) = var("USERDESK_SESSION_PATH") {
            self.session.path = path;
        }

        // Logging overrides
        if let Some(level) = var("USERDESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("USERDESK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Userdesk Configuration
#
# Environment variables override these settings:
# - USERDESK_ENV
# - USERDESK_API_URL
# - USERDESK_SESSION_PATH
# - USERDESK_LOG_LEVEL
# - USERDESK_LOG_FORMAT

[api]
# Which API to talk to: "production" or "local" (http://localhost:8080)
environment = "production"

# Explicit base URL, overrides environment
# base_url = "http://localhost:8080"

# Request timeout in seconds
timeout_secs = 30

# Dedicated session validation endpoint returning {"id": ...}
# validate_path = "/auth/validate"

# Endpoint notified on logout
# logout_path = "/logout"

[session]
# File holding the session token and user id
path = "~/.local/share/userdesk/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}
