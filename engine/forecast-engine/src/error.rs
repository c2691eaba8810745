//! Error types for the forecast engine

use thiserror::Error;

/// Result type alias for forecast operations
pub type Result<T> = std::result::Result<T, ForecastError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Invalid forecast input: {reason}")]
    InvalidInput { reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ForecastError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ForecastError::InvalidInput { reason: reason.into() }
    }
}
