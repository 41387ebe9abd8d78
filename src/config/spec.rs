//! Provider configuration types.
//!
//! `ProviderConfig` is the document an operator writes (or the host passes
//! through); `ProviderSettings` is the resolved, validated form used to build
//! the API client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use validator::Validate;

/// Default Arcane API endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3552/api";

/// Timeout used when `http_timeout` is unset or invalid.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Environment variable consulted when `api_key` is not configured.
pub const API_KEY_ENV: &str = "ARCANE_API_KEY";

/// Provider-level configuration.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Base API endpoint (e.g. `http://localhost:3552/api`).
    #[validate(url(message = "endpoint must be an absolute URL"))]
    pub endpoint: Option<String>,

    /// API key sent as `X-API-Key`. Unset or empty falls back to `ARCANE_API_KEY`.
    pub api_key: Option<String>,

    /// HTTP request timeout such as `120s` or `2m`.
    pub http_timeout: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

/// Resolved provider settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Base endpoint; the client appends a trailing slash when missing.
    pub endpoint: String,
    /// API key (never empty).
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
