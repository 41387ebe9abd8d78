//! Provider configuration.
//!
//! This module handles all configuration-related functionality:
//! - Loading `arcane.yaml` and `.env` files
//! - Resolving defaults (endpoint, `ARCANE_API_KEY`, timeout)
//! - Parsing duration strings such as `120s` or `2m`

mod duration;
mod parser;
mod spec;
mod validator;

pub use duration::parse_duration;
pub use parser::{ConfigParser, DEFAULT_CONFIG_FILES, find_config_file};
pub use spec::{
    API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_HTTP_TIMEOUT, ProviderConfig, ProviderSettings,
};
pub use self::validator::ConfigValidator;
