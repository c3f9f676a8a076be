//! Error types for browser-pilot
//!
//! `PilotError` covers everything that ends a session. Failures of a single
//! model-requested action are [`ActionError`]s and never leave the executor.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for session-level failures
#[derive(Error, Debug)]
pub enum PilotError {
    /// Gemini API or response-shape errors
    #[error("Model error: {0}")]
    Model(String),

    /// Browser launch, screenshot or session errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// API key file does not exist
    #[error("Missing API key file {0}. Create it with your key on the first line.")]
    MissingCredential(PathBuf),

    /// API key file exists but holds nothing
    #[error("API key file {0} is empty. Put your API key on the first line.")]
    EmptyCredential(PathBuf),

    /// A local file the session needs at startup is missing
    #[error("Required file not found: {0}")]
    MissingAsset(PathBuf),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for browser-pilot operations
pub type Result<T> = std::result::Result<T, PilotError>;

impl PilotError {
    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Failure of one requested action. Reported back to the model as data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    /// The model sent arguments that do not fit the action
    #[error("invalid arguments for {action}: {reason}")]
    InvalidArguments { action: String, reason: String },

    /// The browser rejected or failed the operation
    #[error("{0}")]
    Browser(String),
}

impl ActionError {
    /// Create an invalid-arguments error
    pub fn invalid(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Create a browser operation error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }
}

/// A browser operation failed
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct PageError(pub String);

impl PageError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<PageError> for ActionError {
    fn from(err: PageError) -> Self {
        Self::Browser(err.0)
    }
}

impl From<PageError> for PilotError {
    fn from(err: PageError) -> Self {
        Self::Browser(err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_messages() {
        let err = ActionError::invalid("click_at", "missing field `x`");
        assert_eq!(err.to_string(), "invalid arguments for click_at: missing field `x`");

        let err = ActionError::browser("net::ERR_NAME_NOT_RESOLVED");
        assert_eq!(err.to_string(), "net::ERR_NAME_NOT_RESOLVED");
    }

    #[test]
    fn test_credential_errors_name_the_file() {
        let err = PilotError::EmptyCredential(PathBuf::from("gemini_api_key"));
        assert!(err.to_string().contains("gemini_api_key"));
    }
}
