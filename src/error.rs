//! Error types for the Arcane provider.
//!
//! This module provides the error hierarchy for every provider operation:
//! configuration, Arcane API calls, and resource reconciliation.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the Arcane provider.
#[derive(Debug, Error)]
pub enum ArcaneError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Arcane API errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Resource and data source errors.
    #[error("{0}")]
    Resource(#[from] ResourceError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors for resource documents.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// No API key was configured and `ARCANE_API_KEY` is unset.
    #[error("Missing API key: set api_key or the ARCANE_API_KEY environment variable")]
    MissingApiKey,

    /// The endpoint is not a valid base URL.
    #[error("Invalid endpoint '{endpoint}': {message}")]
    InvalidEndpoint {
        /// The rejected endpoint.
        endpoint: String,
        /// Why it was rejected.
        message: String,
    },
}

/// Arcane API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a status of 300 or above.
    #[error("arcane API error: {status}: {body}")]
    Status {
        /// Numeric HTTP status code.
        code: u16,
        /// Status line, e.g. `404 Not Found`.
        status: String,
        /// Trimmed response body.
        body: String,
    },

    /// The request never produced a response.
    #[error("Network error communicating with Arcane: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response from Arcane API: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Resource and data source errors.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// An import ID did not have the expected shape.
    #[error("invalid import id '{id}': expected {expected}")]
    InvalidImportId {
        /// The rejected ID.
        id: String,
        /// Expected shape, e.g. `env_id:project_id`.
        expected: &'static str,
    },

    /// The resource type does not support import.
    #[error("{resource} does not support import")]
    ImportNotSupported {
        /// Resource type name.
        resource: &'static str,
    },

    /// The resource cannot change without replacement.
    #[error("{kind} cannot be updated in place")]
    UpdateNotSupported {
        /// Human-readable resource kind.
        kind: &'static str,
    },

    /// A data source lookup found nothing.
    #[error("{kind} not found")]
    NotFound {
        /// Human-readable resource kind.
        kind: &'static str,
    },

    /// A required attribute is missing from a document.
    #[error("missing required attribute '{attribute}' for {resource}")]
    MissingAttribute {
        /// Resource type name.
        resource: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },

    /// An attribute value failed validation.
    #[error("invalid value for '{attribute}': {message}")]
    InvalidAttribute {
        /// Attribute name.
        attribute: String,
        /// Description of the problem.
        message: String,
    },

    /// A local file referenced by a resource could not be read.
    #[error("read {what} file failed ({path}): {message}")]
    FileRead {
        /// Which file (`compose` or `env`).
        what: &'static str,
        /// Path that was read.
        path: PathBuf,
        /// Underlying IO error.
        message: String,
    },

    /// No resource or data source is registered under the name.
    #[error("unknown {category} type: {name}")]
    UnknownType {
        /// `resource` or `data source`.
        category: &'static str,
        /// The requested type name.
        name: String,
    },

    /// A remote call failed while running an operation.
    #[error("{operation} failed: {source}")]
    Operation {
        /// Operation label, e.g. `create project`.
        operation: String,
        /// The underlying error.
        #[source]
        source: Box<ArcaneError>,
    },
}

/// Result type alias for Arcane provider operations.
pub type Result<T> = std::result::Result<T, ArcaneError>;

impl ArcaneError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the HTTP status code when this is an API status error.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(ApiError::Status { code, .. }) => Some(*code),
            Self::Resource(ResourceError::Operation { source, .. }) => source.status_code(),
            _ => None,
        }
    }

    /// Returns true if the API reported the object as missing (HTTP 404).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.status_code(), Some(404))
    }

    /// Wraps this error with the label of the operation that failed.
    #[must_use]
    pub fn context(self, operation: impl Into<String>) -> Self {
        Self::Resource(ResourceError::Operation {
            operation: operation.into(),
            source: Box::new(self),
        })
    }
}

/// Adds operation labels to fallible results.
pub trait ResultExt<T> {
    /// Labels the error, e.g. `create project failed: ...`.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with the label.
    fn context(self, operation: &str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, operation: &str) -> Result<T> {
        self.map_err(|e| e.context(operation))
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl ApiError {
    /// Creates a status error from a response status and body.
    #[must_use]
    pub fn status(code: u16, status: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Status {
            code,
            status: status.into(),
            body: body.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an invalid-response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }
}

impl ResourceError {
    /// Creates an invalid-attribute error.
    #[must_use]
    pub fn invalid(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            attribute: attribute.into(),
            message: message.into(),
        }
    }
}
