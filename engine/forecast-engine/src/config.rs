use crate::error::ForecastError;
use serde::{Deserialize, Serialize};

/// How the fixed share of a projection is divided across the schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixedDivisor {
    /// Divide by schedule length minus one. Matches historical forecasts,
    /// which assume exactly one bye in the schedule.
    WeeksMinusOne,
    /// Divide by the number of non-BYE weeks, so the non-BYE forecasts sum
    /// exactly to the projection.
    ActiveWeeks,
}

/// Configuration for the Forecast Engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Share of the projection that varies with matchup strength (0 < v < 1)
    pub variable_fraction: f64,

    /// Games in a full season, used to scale projections for games missed
    pub season_games: f64,

    pub divisor: FixedDivisor,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            variable_fraction: 0.3,
            season_games: player_registry::SEASON_GAMES,
            divisor: FixedDivisor::WeeksMinusOne,
        }
    }
}

impl ForecastConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from a variable lookup. Unparsable values are errors.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(fraction) = var("FORECAST_VARIABLE_FRACTION") {
            config.variable_fraction = fraction
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid FORECAST_VARIABLE_FRACTION '{fraction}': {e}"))?;
        }

        if let Some(divisor) = var("FORECAST_DIVISOR") {
            config.divisor = match divisor.as_str() {
                "weeks-minus-one" => FixedDivisor::WeeksMinusOne,
                "active-weeks" => FixedDivisor::ActiveWeeks,
                other => anyhow::bail!("Unknown FORECAST_DIVISOR '{other}'"),
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        if !(self.variable_fraction > 0.0 && self.variable_fraction < 1.0) {
            return Err(ForecastError::Config(format!(
                "variable_fraction must be in (0, 1), got {}",
                self.variable_fraction
            )));
        }
        if !(self.season_games > 0.0) {
            return Err(ForecastError::Config("season_games must be positive".to_string()));
        }
        Ok(())
    }
}
