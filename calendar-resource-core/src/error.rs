//! Error types for the calendar resource.

use thiserror::Error;

/// Errors that can occur while running a resource verb.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider '{0}' is not supported")]
    UnsupportedProvider(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Invalid event parameters: {0}")]
    InvalidParameters(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// The four failure classes a verb can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Config,
    Provider,
    InvalidParameters,
}

impl ResourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResourceError::Input(_)
            | ResourceError::InvalidTimestamp { .. }
            | ResourceError::Io(_)
            | ResourceError::Serialization(_) => ErrorKind::Input,
            ResourceError::Config(_) | ResourceError::UnsupportedProvider(_) => ErrorKind::Config,
            ResourceError::Provider(_) | ResourceError::NotFound(_) => ErrorKind::Provider,
            ResourceError::InvalidParameters(_) => ErrorKind::InvalidParameters,
        }
    }
}

impl From<serde_json::Error> for ResourceError {
    fn from(e: serde_json::Error) -> Self {
        ResourceError::Serialization(e.to_string())
    }
}

/// Result type alias for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;
