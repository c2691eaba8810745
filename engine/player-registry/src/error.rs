//! Error types for the player registry

use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Player '{0}' not found in registry")]
    PlayerNotFound(String),

    #[error("Invalid matchup rating {stars} (expected 1-5 or BYE)")]
    InvalidRating { stars: u8 },

    #[error("Invalid matchup for {player}, week {week}: {reason}")]
    InvalidMatchup { player: String, week: u32, reason: String },

    #[error("Forecast for {player} has {actual} weeks, schedule has {expected}")]
    ForecastLength { player: String, expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
