//! # Roster Store
//!
//! Shared roster state for a live draft. Every change to team membership and
//! every player snapshot handed to the optimizer goes through one lock, so a
//! background [`DraftPoller`] can apply picks while the caller analyses.

pub mod config;
pub mod draft;
pub mod error;
pub mod league;
pub mod poller;
pub mod store;
pub mod team;

pub use config::{PollerConfig, RosterConfig};
pub use draft::{DraftBoard, DraftPick, PickMetadata, PickOutcome};
pub use error::{Result, RosterError};
pub use league::{SleeperRoster, SleeperUser};
pub use poller::{DraftPoller, FilePickFeed, PickFeed};
pub use store::{RosterStore, RosterSummary};
pub use team::FantasyTeam;
