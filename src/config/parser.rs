//! Configuration parser for provider configuration files.
//!
//! This module loads `ProviderConfig` from YAML files and `.env` files,
//! with proper precedence and error handling.

use crate::error::{ArcaneError, ConfigError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::ProviderConfig;

/// Configuration parser for loading provider configuration.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving the `.env` file.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ProviderConfig> {
        let path = path.as_ref();
        info!("Loading provider configuration from: {}", path.display());

        if !path.exists() {
            return Err(ArcaneError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ArcaneError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// An empty document yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<ProviderConfig> {
        debug!("Parsing YAML provider configuration");

        if content.trim().is_empty() {
            return Ok(ProviderConfig::default());
        }

        serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            ArcaneError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                ArcaneError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Configuration file names searched in the working directory and its parents.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["arcane.yaml", "arcane.yml"];

/// Finds the configuration file in `start_dir`, its parents, or the user
/// configuration directory (`<config_dir>/arcane/provider.yaml`).
///
/// Returns `None` when no file exists; provider configuration may come
/// entirely from the environment.
#[must_use]
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let mut current = start_dir.as_ref().to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    let user_config = dirs::config_dir()?.join("arcane").join("provider.yaml");
    user_config.exists().then_some(user_config)
}
