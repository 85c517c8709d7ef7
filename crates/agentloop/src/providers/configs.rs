use std::time::Duration;

use crate::errors::ConfigError;

pub const ANTHROPIC_HOST: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const ANTHROPIC_HOST_ENV: &str = "ANTHROPIC_HOST";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct AnthropicProviderConfig {
    pub host: String,
    pub api_key: String,
    /// Applied to connecting and to the whole request
    pub timeout: Duration,
}

impl AnthropicProviderConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            host: ANTHROPIC_HOST.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Read the credential (required) and host override (optional) from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var(ANTHROPIC_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingEnv(ANTHROPIC_API_KEY_ENV))?;

        let mut config = Self::new(api_key);
        if let Ok(host) = std::env::var(ANTHROPIC_HOST_ENV) {
            if !host.trim().is_empty() {
                config.host = host;
            }
        }
        Ok(config)
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
