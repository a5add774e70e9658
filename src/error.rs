//! Page behavior error types
//!
//! Errors never leave the page behaviors: operations log them and carry on.
//! Only controller initialization surfaces a [`BehaviorResult`].

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while wiring or running page behaviors
#[derive(Error, Debug)]
pub enum BehaviorError {
    /// A DOM call failed (element creation, insertion, listener setup)
    #[error("DOM error: {0}")]
    Dom(String),

    /// The chart collaborator refused or is unavailable
    #[error("Chart error: {0}")]
    Chart(String),

    /// Chart configuration or event payload (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The document has no body to host the notification container
    #[error("Document has no body element")]
    MissingBody,

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<serde_json::Error> for BehaviorError {
    fn from(err: serde_json::Error) -> Self {
        BehaviorError::Serialization(err.to_string())
    }
}

/// Result type alias for page behavior operations
pub type BehaviorResult<T> = Result<T, BehaviorError>;
