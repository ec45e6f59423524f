//! Client configuration
//!
//! Defaults are overlaid by `USER_REGISTRY_*` environment variables.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default registry API root
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default delay before leaving the registration page after a success
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Registry API configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Registry API root, e.g. `http://localhost:8080/api`
    pub base_url: String,
    /// Delay before the registration page redirects to the directory
    pub redirect_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            redirect_delay_ms: DEFAULT_REDIRECT_DELAY_MS,
        }
    }
}

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `USER_REGISTRY_BASE_URL`: API root (default: "http://localhost:8080/api")
    /// - `USER_REGISTRY_REDIRECT_DELAY_MS`: redirect delay in milliseconds (default: 2000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("redirect_delay_ms", DEFAULT_REDIRECT_DELAY_MS as i64)?
            .add_source(::config::Environment::with_prefix("USER_REGISTRY").try_parsing(true))
            .build()?;

        let config: ApiConfig = settings.try_deserialize()?;
        config.validated()
    }

    /// Replace the base URL, e.g. from a command line flag
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        self.base_url = base_url.into();
        self.validated()
    }

    /// Redirect delay as a Duration
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url));
        }
        self.base_url = trimmed;
        Ok(self)
    }
}
