//! Error types for the lineup optimizer

use thiserror::Error;

/// Result type alias for optimizer operations
pub type Result<T> = std::result::Result<T, OptimizerError>;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Cannot draft {draft_size} players when {locked} are already locked")]
    TooManyLocked { locked: usize, draft_size: usize },

    #[error("No eligible candidates remain to fill {needed} open slot(s)")]
    EmptyPool { needed: usize },

    #[error("Invalid optimizer input: {reason}")]
    InvalidInput { reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("League settings parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
