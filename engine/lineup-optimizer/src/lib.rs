//! # Lineup Optimizer
//!
//! Chooses which players to roster at a position, and which of them to start
//! each week, to maximise expected points over a season window.
//!
//! The search is deliberately bounded: free agents are ranked by positional
//! rank and only the top candidates are combined with the players already
//! locked onto the roster. Every candidate group is scored by summing, week by
//! week, the best `start_size` expected scores in the group.

pub mod advisor;
pub mod combinations;
pub mod config;
pub mod error;
pub mod optimizer;
pub mod scoring;

pub use advisor::{DraftAdvisor, PositionNeed, Recommendation};
pub use combinations::{binomial, Combinations};
pub use config::{LeagueSettings, OptimizerConfig, PositionSettings, TeamSettings};
pub use error::{OptimizerError, Result};
pub use optimizer::{optimize, Combination, LineupOptimizer, Partition};
pub use scoring::{score_group, WeeklyLineup};
