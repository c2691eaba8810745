use crate::config::{FixedDivisor, ForecastConfig};
use crate::error::{ForecastError, Result};
use player_registry::{Player, Rating};
use tracing::debug;

/// Weekly score calculator
#[derive(Debug, Clone, Default)]
pub struct ForecastCalculator {
    config: ForecastConfig,
}

impl ForecastCalculator {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Split `projection` into per-week expected scores.
    ///
    /// variable = projection * v
    /// fixed_per_week = (projection - variable) / divisor
    /// points_per_star = variable / total stars
    /// week score = fixed_per_week + points_per_star * stars, or 0 on a BYE
    ///
    /// The output has the same length and order as `ratings`.
    pub fn compute_weekly_scores(&self, projection: f64, ratings: &[Rating]) -> Result<Vec<f64>> {
        if !projection.is_finite() || projection < 0.0 {
            return Err(ForecastError::invalid(format!(
                "projection must be a non-negative number, got {projection}"
            )));
        }
        if ratings.is_empty() {
            return Err(ForecastError::invalid("no weekly ratings"));
        }
        if let Some(bad) = ratings.iter().find(|r| matches!(r, Rating::Stars(s) if !(1..=5).contains(s))) {
            return Err(ForecastError::invalid(format!("rating {bad} outside 1-5")));
        }

        let total_stars: u32 = ratings.iter().map(|r| r.favorability()).sum();
        if total_stars == 0 {
            return Err(ForecastError::invalid("total favorability is zero"));
        }

        let divisor = match self.config.divisor {
            FixedDivisor::WeeksMinusOne => ratings.len() - 1,
            FixedDivisor::ActiveWeeks => ratings.iter().filter(|r| !r.is_bye()).count(),
        };
        if divisor == 0 {
            return Err(ForecastError::invalid("fixed-points divisor is zero"));
        }

        let variable = projection * self.config.variable_fraction;
        let fixed_per_week = (projection - variable) / divisor as f64;
        let points_per_star = variable / total_stars as f64;

        Ok(ratings
            .iter()
            .map(|rating| match rating {
                Rating::Bye => 0.0,
                Rating::Stars(stars) => fixed_per_week + points_per_star * *stars as f64,
            })
            .collect())
    }

    /// Projection scaled by the games a player is forecast to miss
    pub fn adjusted_projection(&self, player: &Player) -> f64 {
        player.adjusted_projection(self.config.season_games)
    }

    /// Weekly forecast for a player's adjusted projection and schedule
    pub fn forecast_player(&self, player: &Player) -> Result<Vec<f64>> {
        let projection = self.adjusted_projection(player);
        let scores = self.compute_weekly_scores(projection, &player.ratings())?;
        debug!("Forecast {} weeks for {} ({:.2} pts)", scores.len(), player.name, projection);
        Ok(scores)
    }
}

/// Weekly scores with the default configuration
pub fn compute_weekly_scores(projection: f64, ratings: &[Rating]) -> Result<Vec<f64>> {
    ForecastCalculator::default().compute_weekly_scores(projection, ratings)
}
