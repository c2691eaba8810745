//! Player Registry - the player repository for the draft assistant
//!
//! Holds every known player with their season projection, weekly matchup
//! ratings and roster availability, and resolves players by id, by external
//! id kind, or by name (with a fuzzy fallback).

pub mod config;
pub mod error;
pub mod loader;
pub mod ranking;
pub mod registry;
pub mod types;

pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use loader::{MatchupLoadReport, MatchupSchedule, PlayerData};
pub use registry::PlayerRegistry;
pub use types::{
    Availability, IdKind, Matchup, Player, PlayerId, Position, Rating, TeamId, SEASON_GAMES,
    SEASON_WEEKS,
};
