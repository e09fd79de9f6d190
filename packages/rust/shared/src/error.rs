//! Error types for Nebo.
//!
//! Library crates use [`NeboError`] via `thiserror`.
//! The `nebo` binary wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Nebo operations.
#[derive(Debug, thiserror::Error)]
pub enum NeboError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP transport error talking to Salesforce or Slack.
    #[error("network error: {0}")]
    Network(String),

    /// The remote API answered, but rejected the call.
    #[error("upstream error: {message}")]
    Upstream { message: String },

    /// Salesforce login failed.
    #[error("authentication error: {0}")]
    Auth(String),

    /// A CRM record field was present with an unexpected type.
    #[error("record shape error: {message}")]
    RecordShape { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid command input or verification failure.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A slash command this app does not serve.
    #[error("unknown slash command {0}")]
    UnknownCommand(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, NeboError>;

impl NeboError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an upstream error from any displayable message.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream {
            message: msg.into(),
        }
    }

    /// Create a record shape error from any displayable message.
    pub fn record_shape(msg: impl Into<String>) -> Self {
        Self::RecordShape {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Error text shown to the Slack user.
    ///
    /// Failures from a remote service carry its message unchanged, with no
    /// category prefix. Everything else uses the `Display` form.
    pub fn reply_text(&self) -> String {
        match self {
            Self::Upstream { message } => message.clone(),
            Self::Network(message) | Self::Auth(message) => message.clone(),
            other => other.to_string(),
        }
    }
}
