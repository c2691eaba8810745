//! Overall and positional rankings by adjusted projection

use crate::registry::PlayerRegistry;
use crate::types::{Player, PlayerId, Position};
use std::cmp::Ordering;
use tracing::debug;

impl PlayerRegistry {
    /// Assign overall ranks to every player and positional ranks to the
    /// ranked positions. Ties on projection fall back to position order
    /// and last name, then id, so ranks are reproducible.
    pub fn assign_rankings(&mut self) {
        let mut overall: Vec<&Player> = self.players().collect();
        overall.sort_by(|a, b| {
            by_projection(a, b)
                .then_with(|| a.position.order().cmp(&b.position.order()))
                .then_with(|| a.last_name().cmp(b.last_name()))
                .then_with(|| a.id.cmp(&b.id))
        });
        let overall: Vec<PlayerId> = overall.into_iter().map(|p| p.id.clone()).collect();

        let mut positional: Vec<(Position, Vec<PlayerId>)> = Vec::new();
        for position in Position::RANKED {
            let mut players: Vec<&Player> = self.players().filter(|p| p.position == position).collect();
            players.sort_by(|a, b| {
                by_projection(a, b)
                    .then_with(|| a.last_name().cmp(b.last_name()))
                    .then_with(|| a.id.cmp(&b.id))
            });
            positional.push((position, players.into_iter().map(|p| p.id.clone()).collect()));
        }

        for (i, id) in overall.iter().enumerate() {
            if let Ok(player) = self.get_mut(id.as_str()) {
                player.rank = (i + 1) as u32;
            }
        }
        for (position, ids) in positional {
            debug!("Ranked {} players at {}", ids.len(), position);
            for (i, id) in ids.iter().enumerate() {
                if let Ok(player) = self.get_mut(id.as_str()) {
                    player.positional_rank = (i + 1) as u32;
                }
            }
        }
    }
}

fn by_projection(a: &Player, b: &Player) -> Ordering {
    b.adj_projection().total_cmp(&a.adj_projection())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rankings() {
        let mut hurt = Player::new("3", "Injured Back", Position::RB, 300.0);
        hurt.projected_games_missed = 8.5;

        let mut registry = PlayerRegistry::from_players(vec![
            Player::new("1", "Josh Allen", Position::QB, 340.0),
            Player::new("2", "Bijan Robinson", Position::RB, 290.0),
            hurt,
            Player::new("4", "Ja'Marr Chase", Position::WR, 290.0),
            Player::new("5", "Team Defense", Position::DEF, 150.0),
        ]);
        registry.assign_rankings();

        assert_eq!(registry.get("1").unwrap().rank, 1);
        // Equal projections: RB sorts ahead of WR
        assert_eq!(registry.get("2").unwrap().rank, 2);
        assert_eq!(registry.get("4").unwrap().rank, 3);
        assert_eq!(registry.get("3").unwrap().rank, 4);

        assert_eq!(registry.get("2").unwrap().positional_rank, 1);
        assert_eq!(registry.get("3").unwrap().positional_rank, 2);
        assert_eq!(registry.get("4").unwrap().positional_rank, 1);
        assert_eq!(registry.get("5").unwrap().positional_rank, 0);
        assert_eq!(registry.get("5").unwrap().rank, 5);
    }
}
