use crate::calculator::ForecastCalculator;
use crate::config::ForecastConfig;
use crate::error::ForecastError;
use player_registry::{PlayerId, PlayerRegistry};
use tracing::{info, warn};

/// Result of forecasting every player in a registry
#[derive(Debug, Clone, Default)]
pub struct ForecastSummary {
    pub updated: usize,
    /// Players without any schedule
    pub skipped: usize,
    pub failed: Vec<(PlayerId, ForecastError)>,
}

/// Applies weekly forecasts to the players held in a registry
pub struct ForecastEngine {
    calculator: ForecastCalculator,
}

impl ForecastEngine {
    pub fn new(config: ForecastConfig) -> Result<Self, ForecastError> {
        config.validate()?;
        Ok(Self { calculator: ForecastCalculator::new(config) })
    }

    pub fn calculator(&self) -> &ForecastCalculator {
        &self.calculator
    }

    /// Recompute `week_fppgs` for every player with a schedule. A player whose
    /// forecast fails keeps a zeroed forecast and is reported in the summary.
    pub fn apply(&self, registry: &mut PlayerRegistry) -> ForecastSummary {
        let mut summary = ForecastSummary::default();

        for player in registry.players_mut() {
            if player.weeks.is_empty() {
                summary.skipped += 1;
                continue;
            }

            let forecast = self.calculator.forecast_player(player).and_then(|scores| {
                player.set_week_fppgs(scores).map_err(|e| ForecastError::invalid(e.to_string()))
            });
            match forecast {
                Ok(()) => summary.updated += 1,
                Err(e) => {
                    warn!("Failed to forecast {}: {}", player.name, e);
                    player.clear_week_fppgs();
                    summary.failed.push((player.id.clone(), e));
                }
            }
        }

        info!(
            "Forecast {} players ({} without schedule, {} failed)",
            summary.updated,
            summary.skipped,
            summary.failed.len()
        );
        summary
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self { calculator: ForecastCalculator::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use player_registry::{Matchup, Player, Position};

    #[test]
    fn test_apply_to_registry() {
        let mut scheduled = Player::new("1", "Scheduled Receiver", Position::WR, 120.0);
        scheduled.set_weeks(vec![
            Matchup::parse(0, "KC", 5).unwrap(),
            Matchup::bye(1),
            Matchup::parse(2, "@LV", 1).unwrap(),
        ]);

        let mut all_byes = Player::new("2", "Bye Only", Position::TE, 50.0);
        all_byes.set_weeks(vec![Matchup::bye(0), Matchup::bye(1)]);

        let unscheduled = Player::new("3", "No Schedule", Position::K, 130.0);

        let mut registry = PlayerRegistry::from_players(vec![scheduled, all_byes, unscheduled]);
        let summary = ForecastEngine::default().apply(&mut registry);

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0.as_str(), "2");

        let receiver = registry.get("1").unwrap();
        assert_eq!(receiver.week_fppgs.len(), 3);
        assert!(receiver.week_fppg(0) > receiver.week_fppg(2));
        assert_eq!(receiver.week_fppg(1), 0.0);

        assert_eq!(registry.get("2").unwrap().week_fppgs, vec![0.0, 0.0]);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ForecastConfig { variable_fraction: 1.5, ..Default::default() };
        assert!(ForecastEngine::new(config).is_err());
    }
}
