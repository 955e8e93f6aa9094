//! Error types for the New Relic MCP server.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for New Relic MCP operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NewRelicError {
    /// Malformed or missing tool arguments, or a metric outside the allowed set.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The outbound NerdGraph call could not complete (connectivity, DNS, timeout, HTTP status).
    #[error("Failed to query New Relic: {0}")]
    Transport(String),

    /// NerdGraph answered but reported one or more query-level errors.
    #[error("NerdGraph errors: {0}")]
    RemoteQuery(String),

    /// The requested tool is not part of the fixed tool set.
    #[error("Unknown tool: {0}")]
    UnknownOperation(String),

    /// Configuration errors (missing credentials, invalid config file, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NewRelicError {
    /// Creates a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a transport error with the given message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a remote query error with the given message.
    pub fn remote_query(msg: impl Into<String>) -> Self {
        Self::RemoteQuery(msg.into())
    }

    /// Creates an unknown operation error for the given tool name.
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation(name.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation Error",
            Self::Transport(_) => "Transport Error",
            Self::RemoteQuery(_) => "Remote Query Error",
            Self::UnknownOperation(_) => "Unknown Operation",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns true if the error was raised before any outbound call was made.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnknownOperation(_))
    }
}

/// Result type alias using NewRelicError.
pub type Result<T> = std::result::Result<T, NewRelicError>;
