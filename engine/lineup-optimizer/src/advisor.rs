//! Draft advisor: what each position still needs, and who to take next

use crate::config::{LeagueSettings, PositionSettings};
use crate::error::{OptimizerError, Result};
use crate::optimizer::{Combination, LineupOptimizer};
use player_registry::{Player, PlayerId, Position};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Roster need at one position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionNeed {
    pub position: Position,
    pub settings: PositionSettings,
    /// Players already on my team at this position
    pub rostered: usize,
}

impl PositionNeed {
    /// Open roster spots, negative when the position is over-drafted
    pub fn remaining(&self) -> i64 {
        self.settings.draft as i64 - self.rostered as i64
    }
}

/// Best free agents at a position and the combinations that surfaced them
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub need: PositionNeed,
    pub players: Vec<Arc<Player>>,
    /// Best first
    pub combinations: Vec<Combination>,
}

pub struct DraftAdvisor {
    optimizer: LineupOptimizer,
    settings: LeagueSettings,
}

impl DraftAdvisor {
    pub fn new(optimizer: LineupOptimizer, settings: LeagueSettings) -> Self {
        Self { optimizer, settings }
    }

    pub fn settings(&self) -> &LeagueSettings {
        &self.settings
    }

    /// Needs for every configured position given a snapshot of all players
    pub fn needs(&self, players: &[Player]) -> Vec<PositionNeed> {
        self.settings
            .positions
            .iter()
            .map(|(&position, &settings)| PositionNeed {
                position,
                settings,
                rostered: players.iter().filter(|p| p.position == position && p.is_picked()).count(),
            })
            .collect()
    }

    /// Recommend up to `recommendations_per_position` free agents for every
    /// position that still has open spots. A position whose pool is exhausted
    /// is skipped with a warning.
    pub fn analyze(&self, players: &[Player]) -> Result<Vec<Recommendation>> {
        let mut recommendations = Vec::new();

        for need in self.needs(players) {
            if need.remaining() < 0 {
                warn!("Drafted too many {}s, draft settings should be reconfigured", need.position);
            }
            if need.remaining() <= 0 {
                continue;
            }

            info!("Analyzing {} ({} open)", need.position, need.remaining());
            let mut pool: Vec<Player> =
                players.iter().filter(|p| p.position == need.position).cloned().collect();
            pool.sort_by(|a, b| a.id.cmp(&b.id));

            let combinations =
                match self.optimizer.optimize(&pool, need.settings.draft, need.settings.start) {
                    Ok(combinations) => combinations,
                    Err(OptimizerError::EmptyPool { needed }) => {
                        warn!("No {} candidates left for {} open spots", need.position, needed);
                        continue;
                    }
                    Err(e) => return Err(e),
                };

            recommendations.push(self.recommend(need, combinations));
        }

        Ok(recommendations)
    }

    /// Walk combinations best-first, collecting distinct free agents
    fn recommend(&self, need: PositionNeed, combinations: Vec<Combination>) -> Recommendation {
        let limit = self.settings.recommendations_per_position;
        let mut seen: HashSet<PlayerId> = HashSet::new();
        let mut players = Vec::new();
        let mut contributing = Vec::new();

        for combination in combinations.into_iter().rev() {
            if players.len() >= limit {
                break;
            }

            let mut contributed = false;
            for player in &combination.players {
                if players.len() >= limit {
                    break;
                }
                if !player.is_free() || !seen.insert(player.id.clone()) {
                    continue;
                }
                players.push(Arc::clone(player));
                contributed = true;
            }

            if contributed {
                contributing.push(combination);
            }
        }

        Recommendation { need, players, combinations: contributing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OptimizerConfig;
    use player_registry::{Availability, Matchup, TeamId};

    fn player(id: &str, position: Position, rank: u32, weekly: f64) -> Player {
        let mut player = Player::new(id, format!("{position} {id}"), position, weekly * 17.0);
        player.positional_rank = rank;
        player.set_weeks((0..18u32).map(|w| Matchup::parse(w, "NO", 3).unwrap()).collect());
        player.set_week_fppgs(vec![weekly; 18]).unwrap();
        player
    }

    fn settings() -> LeagueSettings {
        let mut settings = LeagueSettings::standard(TeamId::from("me"));
        settings.positions.retain(|p, _| matches!(p, Position::QB | Position::TE | Position::K));
        settings.positions.insert(Position::TE, PositionSettings { start: 2, draft: 2 });
        settings.recommendations_per_position = 2;
        settings
    }

    fn advisor() -> DraftAdvisor {
        DraftAdvisor::new(LineupOptimizer::new(OptimizerConfig::default()).unwrap(), settings())
    }

    #[test]
    fn test_needs() {
        let mut qb = player("q1", Position::QB, 1, 20.0);
        qb.availability = Availability::Mine(TeamId::from("me"));
        let mut te = player("t1", Position::TE, 1, 12.0);
        te.availability = Availability::Taken(Some(TeamId::from("rival")));

        let needs = advisor().needs(&[qb, te]);
        let qb_need = needs.iter().find(|n| n.position == Position::QB).unwrap();
        assert_eq!(qb_need.rostered, 1);
        assert_eq!(qb_need.remaining(), 1);
        let te_need = needs.iter().find(|n| n.position == Position::TE).unwrap();
        assert_eq!(te_need.rostered, 0);
        assert_eq!(te_need.remaining(), 2);
    }

    #[test]
    fn test_analyze_recommends_best_free_agents() {
        let mut locked = player("q0", Position::QB, 1, 25.0);
        locked.availability = Availability::Mine(TeamId::from("me"));
        let mut kicker = player("k0", Position::K, 1, 9.0);
        kicker.availability = Availability::Mine(TeamId::from("me"));
        let players = vec![
            locked,
            player("q1", Position::QB, 2, 22.0),
            player("q2", Position::QB, 3, 18.0),
            player("q3", Position::QB, 4, 15.0),
            player("t1", Position::TE, 1, 12.0),
            player("t2", Position::TE, 2, 10.0),
            player("t3", Position::TE, 3, 6.0),
            kicker,
        ];

        let recommendations = advisor().analyze(&players).unwrap();
        // K is full, QB and TE are analyzed
        assert_eq!(recommendations.len(), 2);

        let qb = recommendations.iter().find(|r| r.need.position == Position::QB).unwrap();
        // With one starter and the locked QB scoring most, every pairing ties;
        // the best-first walk starts from the last enumerated group.
        assert_eq!(qb.players.len(), 2);
        assert!(qb.players.iter().all(|p| p.is_free()));
        assert!(!qb.combinations.is_empty());

        let te = recommendations.iter().find(|r| r.need.position == Position::TE).unwrap();
        let ids: Vec<&str> = te.players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert_eq!(te.combinations.len(), 1);
    }

    #[test]
    fn test_exhausted_position_is_skipped() {
        let mut taken = player("k1", Position::K, 1, 8.0);
        taken.availability = Availability::Taken(None);

        let recommendations = advisor().analyze(&[taken]).unwrap();
        assert!(recommendations.iter().all(|r| r.need.position != Position::K));
    }
}
