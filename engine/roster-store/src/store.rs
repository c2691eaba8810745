use crate::draft::{DraftBoard, DraftPick, PickOutcome};
use crate::error::{Result, RosterError};
use crate::league::{SleeperRoster, SleeperUser};
use crate::team::FantasyTeam;
use lineup_optimizer::LeagueSettings;
use parking_lot::Mutex;
use player_registry::{Availability, IdKind, Player, PlayerId, PlayerRegistry, Position, TeamId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Roster Store
///
/// A cloneable handle over the registry and every fantasy team. Membership
/// changes and snapshots each take the lock exactly once; snapshots are owned
/// copies so the optimizer never reads shared state.
#[derive(Clone)]
pub struct RosterStore {
    inner: Arc<Mutex<RosterState>>,
}

struct RosterState {
    registry: PlayerRegistry,
    teams: BTreeMap<TeamId, FantasyTeam>,
    slots: BTreeMap<u32, TeamId>,
    my_team: TeamId,
}

/// My roster at a glance
#[derive(Debug, Clone, Serialize)]
pub struct RosterSummary {
    /// Sorted by position order, then last name
    pub players: Vec<Player>,

    /// Players per NFL team, fewest first
    pub nfl_team_counts: Vec<(String, usize)>,

    pub average_age: Option<f64>,
}

impl RosterState {
    fn availability_for(&self, team: &TeamId) -> Availability {
        if *team == self.my_team {
            Availability::Mine(team.clone())
        } else {
            Availability::Taken(Some(team.clone()))
        }
    }

    fn player_mut(&mut self, id: &PlayerId) -> Result<&mut Player> {
        self.registry.get_mut(id.as_str()).map_err(|_| RosterError::PlayerNotFound(id.to_string()))
    }

    /// Drop a player from whichever team lists them
    fn detach(&mut self, id: &PlayerId) -> Option<TeamId> {
        let team = self.teams.values_mut().find(|t| t.contains(id))?;
        team.players.retain(|p| p != id);
        Some(team.id.clone())
    }

    fn assign(&mut self, id: &PlayerId, team: &TeamId) -> Result<()> {
        if !self.teams.contains_key(team) {
            return Err(RosterError::TeamNotFound(team.to_string()));
        }
        let availability = self.availability_for(team);
        self.player_mut(id)?.availability = availability;

        self.detach(id);
        if let Some(entry) = self.teams.get_mut(team) {
            entry.players.push(id.clone());
        }
        Ok(())
    }

    fn mark_taken(&mut self, id: &PlayerId) -> Result<()> {
        self.player_mut(id)?.availability = Availability::Taken(None);
        self.detach(id);
        Ok(())
    }

    fn release(&mut self, id: &PlayerId) -> Result<Option<TeamId>> {
        self.player_mut(id)?.availability = Availability::Free;
        Ok(self.detach(id))
    }

    fn ensure_team(&mut self, id: &TeamId, name: &str) {
        self.teams.entry(id.clone()).or_insert_with(|| FantasyTeam::new(id.clone(), name));
    }

    fn resolve_player(&self, sleeper_id: &str) -> Option<PlayerId> {
        self.registry.get_by_external_id(IdKind::Sleeper, sleeper_id).ok().map(|p| p.id.clone())
    }

    /// Team for a pick: the named owner, else the owner of the draft slot
    fn pick_team(&self, pick: &DraftPick) -> Option<TeamId> {
        pick.picked_by
            .as_deref()
            .map(TeamId::from)
            .filter(|team| self.teams.contains_key(team))
            .or_else(|| pick.draft_slot.and_then(|slot| self.slots.get(&slot).cloned()))
    }

    fn apply_pick(&mut self, pick: &DraftPick) -> Result<PickOutcome> {
        let Some(id) = self.resolve_player(&pick.metadata.player_id) else {
            warn!("Player {} not found in players", pick.metadata.player_id);
            return Ok(PickOutcome::UnknownPlayer { player_id: pick.metadata.player_id.clone() });
        };

        let player = self.player_mut(&id)?;
        player.actual_cost = pick.cost();
        player.actual_draft_pos = Some(pick.pick_no);
        let already_rostered = !player.is_free();
        let name = player.name.clone();

        match self.pick_team(pick) {
            Some(team) => {
                self.assign(&id, &team)?;
                info!("Drafting {} for {}", name, self.teams[&team].name);
                Ok(PickOutcome::Rostered { player: id, team })
            }
            None if already_rostered => {
                warn!("Player {} has no owner but is already rostered, not removing from team", name);
                Ok(PickOutcome::Kept { player: id })
            }
            None => {
                self.mark_taken(&id)?;
                info!("Drafting {} for an unknown team", name);
                Ok(PickOutcome::TakenByUnknown { player: id })
            }
        }
    }
}

impl RosterStore {
    /// Create a store with an empty roster for `my_team`.
    ///
    /// Players that already carry an owner are listed on that team, and teams
    /// that only appear through a player are created on the fly.
    pub fn new(registry: PlayerRegistry, my_team: TeamId) -> Self {
        let mut state = RosterState {
            registry,
            teams: BTreeMap::new(),
            slots: BTreeMap::new(),
            my_team: my_team.clone(),
        };
        state.ensure_team(&my_team, "Me");

        let mut owned: Vec<(PlayerId, TeamId)> = state
            .registry
            .players()
            .filter_map(|p| p.fantasy_team().map(|t| (p.id.clone(), t.clone())))
            .collect();
        owned.sort();
        for (player, team) in owned {
            state.ensure_team(&team, &team.to_string());
            if let Err(e) = state.assign(&player, &team) {
                warn!("Could not list {} on team {}: {}", player, team, e);
            }
        }

        Self { inner: Arc::new(Mutex::new(state)) }
    }

    /// Create a store with every team named in the league settings
    pub fn from_settings(registry: PlayerRegistry, settings: &LeagueSettings) -> Self {
        let store = Self::new(registry, settings.my_team.clone());
        for team in &settings.teams {
            store.add_team(team.id.clone(), &team.name, team.draft_slot);
        }
        store
    }

    /// Register a team, or rename it and update its slot if already known
    pub fn add_team(&self, id: TeamId, name: &str, draft_slot: Option<u32>) {
        let mut state = self.inner.lock();
        state.ensure_team(&id, name);
        if let Some(team) = state.teams.get_mut(&id) {
            team.name = name.to_string();
            if draft_slot.is_some() {
                team.draft_slot = draft_slot;
            }
        }
        if let Some(slot) = draft_slot {
            state.slots.insert(slot, id);
        }
    }

    /// Add league members as teams and place rostered players on them.
    ///
    /// Returns the number of players placed. Players on a roster without a
    /// known owner are marked taken.
    pub fn load_league(&self, users: &[SleeperUser], rosters: &[SleeperRoster], pre_draft: bool) -> usize {
        let mut state = self.inner.lock();
        for user in users {
            let id = TeamId::new(user.user_id.clone());
            let name = user.display_name.clone().unwrap_or_else(|| user.user_id.clone());
            state.ensure_team(&id, &name);
            if let Some(team) = state.teams.get_mut(&id) {
                team.name = name;
            }
        }

        let mut placed = 0;
        for roster in rosters {
            let owner = roster.owner_id.as_deref().map(TeamId::from).filter(|t| state.teams.contains_key(t));
            for sleeper_id in roster.rostered(pre_draft) {
                let Some(player) = state.resolve_player(sleeper_id) else {
                    warn!("Player {} not found in players", sleeper_id);
                    continue;
                };
                let result = match &owner {
                    Some(team) => state.assign(&player, team),
                    None => state.mark_taken(&player),
                };
                if result.is_ok() {
                    placed += 1;
                }
            }
        }

        info!("Placed {} rostered players across {} teams", placed, state.teams.len());
        placed
    }

    /// Move a player onto a team, leaving any previous team in the same step
    pub fn add_player_to_team(&self, player: &PlayerId, team: &TeamId) -> Result<()> {
        let mut state = self.inner.lock();
        state.assign(player, team)?;
        debug!("Added {} to team {}", player, team);
        Ok(())
    }

    /// Release a rostered player back to free agency, returning the team that
    /// held them (`None` when the owner was unknown)
    pub fn remove_player_from_team(&self, player: &PlayerId) -> Result<Option<TeamId>> {
        let mut state = self.inner.lock();
        if state.player_mut(player)?.is_free() {
            return Err(RosterError::NotRostered { player: player.to_string() });
        }
        state.release(player)
    }

    /// Put a player on my team
    pub fn pick(&self, player: &PlayerId) -> Result<()> {
        let mut state = self.inner.lock();
        let my_team = state.my_team.clone();
        state.assign(player, &my_team)
    }

    /// Mark a player taken by an opponent I could not identify
    pub fn take(&self, player: &PlayerId) -> Result<()> {
        self.inner.lock().mark_taken(player)
    }

    /// Make a player a free agent whatever their state
    pub fn clear(&self, player: &PlayerId) -> Result<()> {
        self.inner.lock().release(player).map(|_| ())
    }

    /// Apply the picks `board` has not seen yet, under a single lock
    pub fn apply_picks(&self, board: &mut DraftBoard, picks: &[DraftPick]) -> Result<Vec<PickOutcome>> {
        let mut state = self.inner.lock();
        board.take_new(picks).iter().map(|pick| state.apply_pick(pick)).collect()
    }

    /// Resolve a player id or (possibly misspelled) name
    pub fn resolve(&self, token: &str) -> Result<PlayerId> {
        self.inner
            .lock()
            .registry
            .find(token)
            .map(|p| p.id.clone())
            .ok_or_else(|| RosterError::PlayerNotFound(token.to_string()))
    }

    /// Owned copy of every player at a position, by positional rank
    pub fn snapshot_position(&self, position: Position) -> Vec<Player> {
        self.inner.lock().registry.players_at(position).into_iter().cloned().collect()
    }

    /// Owned copy of every player, ordered by id
    pub fn snapshot_all(&self) -> Vec<Player> {
        let state = self.inner.lock();
        let mut players: Vec<Player> = state.registry.players().cloned().collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        players
    }

    pub fn player(&self, id: &PlayerId) -> Result<Player> {
        self.inner.lock().registry.get(id.as_str()).cloned().map_err(RosterError::from)
    }

    pub fn my_team(&self) -> TeamId {
        self.inner.lock().my_team.clone()
    }

    pub fn team(&self, id: &TeamId) -> Option<FantasyTeam> {
        let state = self.inner.lock();
        let mut team = state.teams.get(id)?.clone();
        team.calc_score(&state.registry);
        Some(team)
    }

    /// Every team with a fresh score, best first
    pub fn teams(&self) -> Vec<FantasyTeam> {
        let state = self.inner.lock();
        let mut teams: Vec<FantasyTeam> = state
            .teams
            .values()
            .cloned()
            .map(|mut team| {
                team.calc_score(&state.registry);
                team
            })
            .collect();
        teams.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| b.name.cmp(&a.name)));
        teams
    }

    pub fn summary(&self) -> RosterSummary {
        let state = self.inner.lock();
        let mut players: Vec<Player> = state.registry.players().filter(|p| p.is_picked()).cloned().collect();
        players.sort_by(|a, b| {
            a.position
                .order()
                .cmp(&b.position.order())
                .then_with(|| a.last_name().cmp(b.last_name()))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut counts: HashMap<String, usize> = HashMap::new();
        for player in &players {
            *counts.entry(player.nfl_team.clone().unwrap_or_default()).or_default() += 1;
        }
        let mut nfl_team_counts: Vec<(String, usize)> = counts.into_iter().collect();
        nfl_team_counts.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let average_age = (!players.is_empty())
            .then(|| players.iter().map(|p| p.age as f64).sum::<f64>() / players.len() as f64);

        RosterSummary { players, nfl_team_counts, average_age }
    }
}
