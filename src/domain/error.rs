//! Application error types with proper error chaining.

use thiserror::Error;

/// Longest slice of a remote response body carried inside an error message.
pub const MAX_ERROR_BODY_CHARS: usize = 200;

/// Fatal startup errors. The exporter never runs partially configured.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No credential: ADMIN_MACAROON_HEX is unset and {path} could not be read")]
    MissingCredential { path: String },
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error("Unsupported metric command: {label}={command}")]
    UnsupportedCommand { label: String, command: String },
    #[error("Duplicate metric name: {0}")]
    DuplicateMetric(String),
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Errors raised while talking to the node or interpreting its payloads.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("LND HTTP {status} for {uri}: {body}")]
    HttpStatus { status: u16, uri: String, body: String },
    #[error("LND request failed after {attempts} attempt(s): {uri}")]
    RequestExhausted {
        uri: String,
        attempts: u32,
        #[source]
        source: Box<NodeError>,
    },
    #[error("Invalid JSON from node: {0}")]
    InvalidJson(String),
    #[error("Key path segment not found: {segment}")]
    PathNotFound { segment: String },
    #[error("Value at '{path}' is not numeric: {found}")]
    TypeMismatch { path: String, found: String },
}

impl NodeError {
    /// Builds an [`NodeError::HttpStatus`], truncating the body.
    pub fn http_status(status: u16, uri: &str, body: &str) -> Self {
        NodeError::HttpStatus {
            status,
            uri: uri.to_string(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }
}

impl From<serde_json::Error> for NodeError {
    fn from(err: serde_json::Error) -> Self {
        NodeError::InvalidJson(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Node(#[from] NodeError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(err: validator::ValidationErrors) -> Self {
        ConfigError::Validation(err.to_string())
    }
}
