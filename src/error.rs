//! Error types for message resolution.
//!
//! Missing translations are not errors: they are absorbed by the repository
//! and handed to the configured [`NotFoundStrategy`](crate::NotFoundStrategy).
//! Only caller mistakes and broken documents surface here.

use thiserror::Error;

/// Errors raised by the message repository and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The caller passed an argument that violates the API contract.
    #[error("invalid argument: {0} must not be empty")]
    InvalidArgument(&'static str),

    /// A document was found but its content could not be parsed.
    #[error("failed to parse '{filename}': {message}")]
    Parse { filename: String, message: String },

    /// No loader is registered for the document's format.
    #[error("unsupported document format: '{0}'")]
    UnsupportedFormat(String),

    /// The repository was built with an invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MessageError {
    pub(crate) fn parse(filename: &str, message: impl ToString) -> Self {
        MessageError::Parse {
            filename: filename.to_string(),
            message: message.to_string(),
        }
    }
}

/// Result type for message operations
pub type Result<T> = std::result::Result<T, MessageError>;
