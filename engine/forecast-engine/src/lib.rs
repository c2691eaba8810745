//! Forecast Engine
//!
//! Turns a season-total point projection plus weekly matchup ratings into
//! per-week expected scores. A fixed share of the projection is spread evenly
//! over the season and the variable share is handed out per matchup star.

pub mod calculator;
pub mod config;
pub mod engine;
pub mod error;

pub use calculator::{compute_weekly_scores, ForecastCalculator};
pub use config::{FixedDivisor, ForecastConfig};
pub use engine::{ForecastEngine, ForecastSummary};
pub use error::{ForecastError, Result};
