//! The single error kind surfaced by connector operations.

use crate::config::ConfigError;
use serde::Serialize;
use std::fmt;
use xdome_client::ClientError;
use xdome_core::PayloadError;

/// What went wrong, as reported to the caller.
///
/// Serializes to `{"error_description": "..."}` for classified server
/// rejections and to a bare string otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Server-provided description of a 400, 401, or 404
    Described {
        /// Description text
        error_description: String,
    },
    /// Any other failure
    Message(String),
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDetail::Described { error_description } => {
                write!(f, "{{'error_description': '{error_description}'}}")
            }
            ErrorDetail::Message(message) => f.write_str(message),
        }
    }
}

/// Error returned by every connector operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{detail}")]
pub struct ConnectorError {
    /// Error payload
    pub detail: ErrorDetail,
}

impl ConnectorError {
    /// Error carrying a server description.
    #[must_use]
    pub fn described(error_description: impl Into<String>) -> Self {
        Self {
            detail: ErrorDetail::Described {
                error_description: error_description.into(),
            },
        }
    }

    /// Error carrying a plain message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            detail: ErrorDetail::Message(message.into()),
        }
    }

    /// The description or message text.
    #[must_use]
    pub fn error_description(&self) -> &str {
        match &self.detail {
            ErrorDetail::Described { error_description } => error_description,
            ErrorDetail::Message(message) => message,
        }
    }
}

impl From<ClientError> for ConnectorError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api {
                error_description, ..
            } => Self::described(error_description),
            other => Self::message(other.to_string()),
        }
    }
}

impl From<PayloadError> for ConnectorError {
    fn from(err: PayloadError) -> Self {
        Self::message(err.to_string())
    }
}

impl From<ConfigError> for ConnectorError {
    fn from(err: ConfigError) -> Self {
        Self::message(err.to_string())
    }
}
