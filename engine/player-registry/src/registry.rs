use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::types::{IdKind, Player, PlayerId, Position};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::HashMap;
use tracing::{debug, info};

/// Player Registry - the repository of every known player
///
/// Players are owned by id. Name and external-id indices are rebuilt on
/// every insert so lookups never see a stale mapping.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    /// Map from player id to Player
    players_by_id: HashMap<PlayerId, Player>,

    /// Map from full name to player id
    ids_by_name: HashMap<String, PlayerId>,

    /// Map from (id kind, external id) to player id
    ids_by_external: HashMap<(IdKind, String), PlayerId>,

    config: RegistryConfig,
}

impl PlayerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Build a registry from a list of players
    pub fn from_players(players: impl IntoIterator<Item = Player>) -> Self {
        let mut registry = Self::new();
        for player in players {
            registry.add(player);
        }
        registry
    }

    /// Insert or replace a player and index it by name and external ids
    pub fn add(&mut self, player: Player) {
        if let Some(outgoing) = self.players_by_id.remove(&player.id) {
            self.unindex(&outgoing);
        }

        match self.ids_by_name.get(&player.name).and_then(|id| self.players_by_id.get(id)) {
            Some(existing) if existing.id != player.id => {
                // Keep the more relevant entry for ambiguous names
                if rank_key(player.search_rank) < rank_key(existing.search_rank) {
                    debug!("{} already indexed by name, overwriting", player.name);
                    self.ids_by_name.insert(player.name.clone(), player.id.clone());
                } else {
                    debug!("{} already indexed by name, not overwriting", player.name);
                }
            }
            _ => {
                self.ids_by_name.insert(player.name.clone(), player.id.clone());
            }
        }

        self.ids_by_external.insert((IdKind::Sleeper, player.id.0.clone()), player.id.clone());
        for (kind, value) in &player.external_ids {
            if !value.is_empty() {
                self.ids_by_external.insert((*kind, value.clone()), player.id.clone());
            }
        }

        self.players_by_id.insert(player.id.clone(), player);
    }

    /// Drop the name and external-id entries that still point at `player`
    fn unindex(&mut self, player: &Player) {
        if self.ids_by_name.get(&player.name) == Some(&player.id) {
            self.ids_by_name.remove(&player.name);
            // Hand the name to the most relevant remaining namesake
            let heir = self
                .players_by_id
                .values()
                .filter(|p| p.name == player.name)
                .min_by(|a, b| rank_key(a.search_rank).cmp(&rank_key(b.search_rank)).then_with(|| a.id.cmp(&b.id)))
                .map(|p| p.id.clone());
            if let Some(heir) = heir {
                self.ids_by_name.insert(player.name.clone(), heir);
            }
        }
        self.ids_by_external.retain(|_, id| *id != player.id);
    }

    /// Get a player by id
    pub fn get(&self, id: &str) -> Result<&Player> {
        self.players_by_id.get(id).ok_or_else(|| RegistryError::PlayerNotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut Player> {
        self.players_by_id.get_mut(id).ok_or_else(|| RegistryError::PlayerNotFound(id.to_string()))
    }

    /// Get a player by an external identifier
    pub fn get_by_external_id(&self, kind: IdKind, value: &str) -> Result<&Player> {
        self.ids_by_external
            .get(&(kind, value.to_string()))
            .and_then(|id| self.players_by_id.get(id))
            .ok_or_else(|| RegistryError::PlayerNotFound(format!("{kind:?}:{value}")))
    }

    /// Get a player by exact full name
    pub fn get_by_name(&self, name: &str) -> Result<&Player> {
        self.ids_by_name
            .get(name)
            .and_then(|id| self.players_by_id.get(id))
            .ok_or_else(|| RegistryError::PlayerNotFound(name.to_string()))
    }

    /// Resolve a token to a player: id, exact name, name without a
    /// generational suffix, first-name alias, then fuzzy match.
    pub fn find(&self, token: &str) -> Option<&Player> {
        let token = token.trim();
        if let Some(player) = self.players_by_id.get(token) {
            return Some(player);
        }
        if let Ok(player) = self.get_by_name(token) {
            return Some(player);
        }

        let mut name = token;
        for suffix in &self.config.name_suffixes {
            if let Some(stripped) = name.strip_suffix(suffix.as_str()) {
                name = stripped.trim();
            }
        }
        if let Ok(player) = self.get_by_name(name) {
            return Some(player);
        }

        for (from, to) in &self.config.first_name_aliases {
            if name.starts_with(from.as_str()) {
                if let Ok(player) = self.get_by_name(&name.replacen(from.as_str(), to, 1)) {
                    return Some(player);
                }
            }
        }

        self.fuzzy_find(name)
    }

    fn fuzzy_find(&self, name: &str) -> Option<&Player> {
        let matcher = SkimMatcherV2::default().ignore_case();
        let best = self
            .ids_by_name
            .keys()
            .filter_map(|candidate| matcher.fuzzy_match(candidate, name).map(|score| (score, candidate)))
            // Highest score wins, ties go to the alphabetically first name
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(a.1)));

        match best {
            Some((score, candidate)) if score >= self.config.fuzzy_min_score => {
                info!("Resolved {} -> {} (score {})", name, candidate, score);
                self.get_by_name(candidate).ok()
            }
            Some((score, candidate)) => {
                info!("Could not resolve {} -> {} (score {})", name, candidate, score);
                None
            }
            None => {
                info!("Could not resolve {}", name);
                None
            }
        }
    }

    /// Iterate over every player
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players_by_id.values()
    }

    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players_by_id.values_mut()
    }

    /// Players at a position, ordered by positional rank then id
    pub fn players_at(&self, position: Position) -> Vec<&Player> {
        let mut players: Vec<&Player> =
            self.players_by_id.values().filter(|p| p.position == position).collect();
        players.sort_by(|a, b| {
            rank_key(Some(a.positional_rank).filter(|r| *r > 0))
                .cmp(&rank_key(Some(b.positional_rank).filter(|r| *r > 0)))
                .then_with(|| a.id.cmp(&b.id))
        });
        players
    }

    pub fn len(&self) -> usize {
        self.players_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players_by_id.is_empty()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

/// Sort key for optional ranks, unranked sorts last
fn rank_key(rank: Option<u32>) -> u32 {
    rank.unwrap_or(u32::MAX)
}
