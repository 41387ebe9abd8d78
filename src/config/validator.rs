//! Provider configuration validation and resolution.
//!
//! Turns a [`ProviderConfig`] into [`ProviderSettings`], applying the
//! endpoint default, the `ARCANE_API_KEY` fallback and the timeout default.

use crate::error::{ConfigError, Result};
use tracing::{debug, warn};
use validator::Validate;

use super::duration::parse_duration;
use super::spec::{
    API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_HTTP_TIMEOUT, ProviderConfig, ProviderSettings,
};

/// Validator for provider configuration.
#[derive(Debug, Default)]
pub struct ConfigValidator {
    /// API key taken from the environment, if any.
    env_api_key: Option<String>,
}

impl ConfigValidator {
    /// Creates a validator that falls back to `ARCANE_API_KEY`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            env_api_key: std::env::var(API_KEY_ENV).ok(),
        }
    }

    /// Creates a validator with an explicit environment API key.
    #[must_use]
    pub const fn with_env_api_key(env_api_key: Option<String>) -> Self {
        Self { env_api_key }
    }

    /// Validates the configuration and resolves defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a URL or no non-empty API key
    /// is available from either source.
    pub fn resolve(&self, config: &ProviderConfig) -> Result<ProviderSettings> {
        config.validate().map_err(|e| {
            let field = e
                .field_errors()
                .keys()
                .next()
                .map_or_else(String::new, ToString::to_string);
            ConfigError::validation(e.to_string(), field)
        })?;

        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| self.env_api_key.clone())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let timeout = match config.http_timeout.as_deref() {
            None => DEFAULT_HTTP_TIMEOUT,
            Some(raw) => match parse_duration(raw) {
                Some(d) if !d.is_zero() => d,
                _ => {
                    warn!("Ignoring invalid http_timeout '{raw}', using default");
                    DEFAULT_HTTP_TIMEOUT
                }
            },
        };

        debug!("Resolved provider endpoint {endpoint} with timeout {timeout:?}");

        Ok(ProviderSettings {
            endpoint,
            api_key,
            timeout,
        })
    }
}
