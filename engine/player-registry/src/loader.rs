use crate::error::{RegistryError, Result};
use crate::registry::PlayerRegistry;
use crate::types::{Matchup, Player};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Container for a season of player data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    /// Season year
    pub season: String,
    /// When this data was last updated
    pub last_updated: DateTime<Utc>,
    pub players: Vec<Player>,
}

impl PlayerData {
    pub fn new(season: String) -> Self {
        Self { season, last_updated: Utc::now(), players: Vec::new() }
    }
}

/// Raw schedule document: player name -> `[week, opponent, stars]` entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchupSchedule(pub BTreeMap<String, Vec<(u32, String, u8)>>);

impl MatchupSchedule {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parsed weekly matchups for one player
    pub fn matchups_for(&self, name: &str) -> Option<Result<Vec<Matchup>>> {
        self.0.get(name).map(|weeks| parse_weeks(name, weeks))
    }
}

fn parse_weeks(name: &str, weeks: &[(u32, String, u8)]) -> Result<Vec<Matchup>> {
    weeks
        .iter()
        .map(|(week, opponent, stars)| {
            Matchup::parse(*week, opponent, *stars).map_err(|e| RegistryError::InvalidMatchup {
                player: name.to_string(),
                week: *week,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Outcome of applying a schedule document to the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchupLoadReport {
    pub applied: usize,
    pub unknown_players: Vec<String>,
}

impl PlayerRegistry {
    /// Load player data from a JSON file, replacing any player with the same id
    pub async fn load_from_file<P: AsRef<Path>>(&mut self, file_path: P) -> Result<usize> {
        info!("Loading player data from: {:?}", file_path.as_ref());

        let json_content = tokio::fs::read_to_string(&file_path).await?;
        let count = self.load_from_json(&json_content)?;

        info!("Loaded {} players from file", count);
        Ok(count)
    }

    pub fn load_from_json(&mut self, json: &str) -> Result<usize> {
        let player_data: PlayerData = serde_json::from_str(json)?;
        let count = player_data.players.len();
        for player in player_data.players {
            self.add(player);
        }
        Ok(count)
    }

    /// Load a matchup schedule file and attach it to the matching players
    pub async fn load_matchups_from_file<P: AsRef<Path>>(
        &mut self,
        file_path: P,
    ) -> Result<MatchupLoadReport> {
        info!("Loading matchups from: {:?}", file_path.as_ref());

        let json_content = tokio::fs::read_to_string(&file_path).await?;
        let schedule = MatchupSchedule::from_json(&json_content)?;
        self.apply_matchups(&schedule)
    }

    /// Attach schedules to players resolved by name. Unknown names are
    /// reported and skipped; a malformed week fails the whole load.
    pub fn apply_matchups(&mut self, schedule: &MatchupSchedule) -> Result<MatchupLoadReport> {
        let mut report = MatchupLoadReport::default();

        for (name, weeks) in &schedule.0 {
            let Some(id) = self.find(name).map(|p| p.id.clone()) else {
                info!("Unknown player in matchups: {}", name);
                report.unknown_players.push(name.clone());
                continue;
            };

            let weeks = parse_weeks(name, weeks)?;
            self.get_mut(id.as_str())?.set_weeks(weeks);
            report.applied += 1;
        }

        info!(
            "Applied matchups to {} players ({} unknown)",
            report.applied,
            report.unknown_players.len()
        );
        Ok(report)
    }
}
