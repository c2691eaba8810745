//! Error types for the roster store

use thiserror::Error;

/// Result type alias for roster operations
pub type Result<T> = std::result::Result<T, RosterError>;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Fantasy team not found: {0}")]
    TeamNotFound(String),

    #[error("Player {player} is not on a fantasy team")]
    NotRostered { player: String },

    #[error("Pick feed error: {message}")]
    Feed { message: String },

    #[error("Registry error: {0}")]
    Registry(#[from] player_registry::RegistryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
