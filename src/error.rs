use thiserror::Error;

/// Errors produced while resolving and executing element commands
#[derive(Error, Debug)]
pub enum CommandError {
    /// Malformed selector, strategy or options; raised before any protocol call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Element lookup exceeded its timeout and suppression was not requested
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// The protocol action executor rejected the call
    #[error("Protocol action '{action}' failed: {reason}")]
    ProtocolError { action: String, reason: String },

    /// No command registered under the requested name
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Shorthand for a protocol failure of the named action
    pub fn protocol(action: impl Into<String>, reason: impl ToString) -> Self {
        Self::ProtocolError {
            action: action.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CommandError>;
