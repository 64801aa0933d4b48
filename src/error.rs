// Typed errors with thiserror. Surface meaningful messages to JS.

use thiserror::Error;

/// Spotlight engine error types.
#[derive(Error, Debug)]
pub enum SpotlightError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Session is not running")]
    NotRunning,

    #[error("Invalid caption boxes: {0}")]
    InvalidCaptions(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SpotlightError {
    fn from(err: serde_json::Error) -> Self {
        SpotlightError::Serialization(err.to_string())
    }
}

pub type SpotlightResult<T> = Result<T, SpotlightError>;
