use player_registry::{PlayerId, PlayerRegistry, TeamId, SEASON_GAMES};
use serde::Serialize;
use std::fmt;

/// A fantasy team and the players it rosters
#[derive(Debug, Clone, Serialize)]
pub struct FantasyTeam {
    pub id: TeamId,
    pub name: String,
    pub draft_slot: Option<u32>,
    pub players: Vec<PlayerId>,

    /// Mean projected points per game across the roster
    pub score: f64,
}

impl FantasyTeam {
    pub fn new(id: TeamId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), draft_slot: None, players: Vec::new(), score: 0.0 }
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.contains(id)
    }

    /// Sum of member projections over member count over a season of games,
    /// zero for an empty roster
    pub fn calc_score(&mut self, registry: &PlayerRegistry) {
        let total: f64 = self
            .players
            .iter()
            .filter_map(|id| registry.get(id.as_str()).ok())
            .map(|p| p.projection)
            .sum();

        self.score = if total > 0.0 && !self.players.is_empty() {
            total / self.players.len() as f64 / SEASON_GAMES
        } else {
            0.0
        };
    }
}

impl fmt::Display for FantasyTeam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} players, score: {:.2})", self.name, self.players.len(), self.score)
    }
}
