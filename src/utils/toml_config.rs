//! TOML-based configuration for DeepSearch
//!
//! Everything is optional: a missing `deepsearch.toml` yields the defaults,
//! and each section can be given partially. The model API key itself never
//! lives in the file; `[provider].api_key_env` names the environment variable
//! that holds it.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! log_level = "info"
//!
//! [provider]
//! api_base = "https://generativelanguage.googleapis.com/v1beta"
//! api_key_env = "GEMINI_API_KEY"
//! timeout_secs = 120
//!
//! [models]
//! query_generator = "gemini-2.5-flash"
//! web_search = "gemini-2.5-flash"
//! flash = "gemini-2.5-flash"
//! pro = "gemini-2.5-pro"
//! ```

use crate::llm::gemini::DEFAULT_GEMINI_API_BASE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Root configuration structure loaded from deepsearch.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeepSearchConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub models: ModelsConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Environment variable name containing the Gemini API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_GEMINI_API_BASE.to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ============= Model Configuration =============

/// Model names per research role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_flash_model")]
    pub query_generator: String,

    #[serde(default = "default_flash_model")]
    pub web_search: String,

    /// Reflection/answer model for the flash tier
    #[serde(default = "default_flash_model")]
    pub flash: String,

    /// Reflection/answer model for the pro tier
    #[serde(default = "default_pro_model")]
    pub pro: String,
}

fn default_flash_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_pro_model() -> String {
    "gemini-2.5-pro".to_string()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            query_generator: default_flash_model(),
            web_search: default_flash_model(),
            flash: default_flash_model(),
            pro: default_pro_model(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl DeepSearchConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: DeepSearchConfig = toml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::FileNotFound(missing)) => {
                debug!("No config file at {:?}, using defaults", missing);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.timeout_secs must be non-zero".to_string(),
            ));
        }

        if self.provider.api_key_env.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.api_key_env must name an environment variable".to_string(),
            ));
        }

        let models = [
            ("query_generator", &self.models.query_generator),
            ("web_search", &self.models.web_search),
            ("flash", &self.models.flash),
            ("pro", &self.models.pro),
        ];
        for (role, model) in models {
            if model.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "models.{} must not be empty",
                    role
                )));
            }
        }

        Ok(())
    }

    /// Read the API key from the configured environment variable
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        let name = &self.provider.api_key_env;
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(name.clone())),
        }
    }
}
