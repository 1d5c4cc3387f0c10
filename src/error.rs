//! Error types for DID:WEB resolution operations.
//!
//! Every failure in the resolution pipeline is reported as exactly one
//! [`ResolutionError`]. The variant is the stage that failed and carries a
//! human-readable message with enough context to diagnose the problem.

use std::fmt;

use thiserror::Error;
use url::ParseError;

/// Errors that can occur during DID:WEB resolution operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The resolution options are malformed or contain unknown values
    #[error("invalid resolution options: {0}")]
    InvalidOptions(String),

    /// The DID string is malformed or not a `did:web` identifier
    #[error("invalid DID: {0}")]
    InvalidInput(String),

    /// The DNS-over-HTTPS lookup failed or returned no usable address
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// Transport failure or non-200 response
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body is not a JSON object
    #[error("JSON error: {0}")]
    Json(String),

    /// The document `id` does not match the requested DID
    #[error("validation failed: {0}")]
    Validation(String),
}

/// The tag identifying which kind of failure a [`ResolutionError`] is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Options,
    Input,
    Dns,
    Http,
    Json,
    Validation,
}

impl ErrorKind {
    /// The snake_case tag for this kind, e.g. `input_error`
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Options => "options_error",
            ErrorKind::Input => "input_error",
            ErrorKind::Dns => "dns_error",
            ErrorKind::Http => "http_error",
            ErrorKind::Json => "json_error",
            ErrorKind::Validation => "validation_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ResolutionError {
    /// Returns the kind tag of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolutionError::InvalidOptions(_) => ErrorKind::Options,
            ResolutionError::InvalidInput(_) => ErrorKind::Input,
            ResolutionError::Dns(_) => ErrorKind::Dns,
            ResolutionError::Http(_) => ErrorKind::Http,
            ResolutionError::Json(_) => ErrorKind::Json,
            ResolutionError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Returns the message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            ResolutionError::InvalidOptions(msg)
            | ResolutionError::InvalidInput(msg)
            | ResolutionError::Dns(msg)
            | ResolutionError::Http(msg)
            | ResolutionError::Json(msg)
            | ResolutionError::Validation(msg) => msg,
        }
    }
}

impl From<reqwest::Error> for ResolutionError {
    fn from(err: reqwest::Error) -> Self {
        ResolutionError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for ResolutionError {
    fn from(err: serde_json::Error) -> Self {
        ResolutionError::Json(err.to_string())
    }
}

impl From<ParseError> for ResolutionError {
    fn from(err: ParseError) -> Self {
        ResolutionError::InvalidInput(err.to_string())
    }
}
