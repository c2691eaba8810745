//! Configuration for the optimizer and the league it drafts for

use crate::error::{OptimizerError, Result};
use player_registry::{Position, TeamId, SEASON_WEEKS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Search bounds and scoring window for the optimizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Free agents kept after ranking
    pub candidate_limit: usize,

    /// Free agents kept when the draft size exceeds `wide_draft_threshold`
    pub wide_candidate_limit: usize,

    pub wide_draft_threshold: usize,

    /// Weeks scored, counted from the start of the season
    pub evaluation_weeks: usize,

    /// Keep only the best N weekly totals, `None` keeps every week
    pub best_weeks: Option<usize>,

    /// Schedule length a free agent needs to be considered
    pub season_weeks: usize,

    /// Oldest free agent considered
    pub max_age: u32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            candidate_limit: 50,
            wide_candidate_limit: 30,
            wide_draft_threshold: 4,
            evaluation_weeks: SEASON_WEEKS,
            best_weeks: None,
            season_weeks: SEASON_WEEKS,
            max_age: 100,
        }
    }
}

impl OptimizerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from a variable lookup. Unparsable values are errors;
    /// an empty `OPTIMIZER_BEST_WEEKS` keeps every week.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(limit) = var("OPTIMIZER_CANDIDATE_LIMIT") {
            config.candidate_limit = parse_var("OPTIMIZER_CANDIDATE_LIMIT", &limit)?;
        }

        if let Some(weeks) = var("OPTIMIZER_EVALUATION_WEEKS") {
            config.evaluation_weeks = parse_var("OPTIMIZER_EVALUATION_WEEKS", &weeks)?;
        }

        if let Some(best) = var("OPTIMIZER_BEST_WEEKS") {
            config.best_weeks = match best.trim() {
                "" => None,
                best => Some(parse_var("OPTIMIZER_BEST_WEEKS", best)?),
            };
        }

        if let Some(age) = var("OPTIMIZER_MAX_AGE") {
            config.max_age = parse_var("OPTIMIZER_MAX_AGE", &age)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.candidate_limit == 0 || self.wide_candidate_limit == 0 {
            return Err(OptimizerError::Config("candidate limits must be positive".to_string()));
        }
        if self.evaluation_weeks == 0 {
            return Err(OptimizerError::Config("evaluation_weeks must be positive".to_string()));
        }
        if self.best_weeks == Some(0) {
            return Err(OptimizerError::Config("best_weeks must be positive".to_string()));
        }
        Ok(())
    }

    /// Candidate bound for a given draft size
    pub fn candidate_limit_for(&self, draft_size: usize) -> usize {
        if draft_size > self.wide_draft_threshold {
            self.wide_candidate_limit
        } else {
            self.candidate_limit
        }
    }
}

/// Starters and total roster size for one position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSettings {
    pub start: usize,
    pub draft: usize,
}

/// A fantasy team in the league
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSettings {
    pub id: TeamId,
    pub name: String,

    /// Draft slot, used when a pick does not name its owner
    #[serde(default)]
    pub draft_slot: Option<u32>,
}

/// League roster settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSettings {
    #[serde(default)]
    pub league_name: String,

    /// The team I draft for
    pub my_team: TeamId,

    #[serde(default)]
    pub teams: Vec<TeamSettings>,

    pub positions: BTreeMap<Position, PositionSettings>,

    #[serde(default = "default_recommendations")]
    pub recommendations_per_position: usize,
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| OptimizerError::Config(format!("invalid {key} '{value}': {e}")))
}

fn default_recommendations() -> usize {
    4
}

impl LeagueSettings {
    /// Standard settings: QB 1/2, RB 3/5, WR 2/3, TE 1/2, K 1/1
    pub fn standard(my_team: TeamId) -> Self {
        let positions = [
            (Position::QB, 1, 2),
            (Position::RB, 3, 5),
            (Position::WR, 2, 3),
            (Position::TE, 1, 2),
            (Position::K, 1, 1),
        ]
        .into_iter()
        .map(|(position, start, draft)| (position, PositionSettings { start, draft }))
        .collect();

        Self {
            league_name: String::new(),
            my_team,
            teams: Vec::new(),
            positions,
            recommendations_per_position: default_recommendations(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load league settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let mut slots = std::collections::BTreeSet::new();
        for team in &self.teams {
            if let Some(slot) = team.draft_slot {
                if !slots.insert(slot) {
                    return Err(OptimizerError::Config(format!("draft slot {slot} assigned twice")));
                }
            }
        }
        for (position, settings) in &self.positions {
            if settings.start == 0 || settings.start > settings.draft {
                return Err(OptimizerError::Config(format!(
                    "{position}: start ({}) must be between 1 and draft ({})",
                    settings.start, settings.draft
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OptimizerConfig::default();
        assert_eq!(config.candidate_limit_for(3), 50);
        assert_eq!(config.candidate_limit_for(4), 50);
        assert_eq!(config.candidate_limit_for(5), 30);
        assert_eq!(config.evaluation_weeks, 18);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = OptimizerConfig { best_weeks: Some(0), ..Default::default() };
        assert!(matches!(config.validate(), Err(OptimizerError::Config(_))));
    }

    #[test]
    fn test_from_vars() {
        let config = OptimizerConfig::from_vars(|key| match key {
            "OPTIMIZER_CANDIDATE_LIMIT" => Some("40".to_string()),
            "OPTIMIZER_BEST_WEEKS" => Some("14".to_string()),
            "OPTIMIZER_MAX_AGE" => Some("30".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.candidate_limit, 40);
        assert_eq!(config.evaluation_weeks, 18);
        assert_eq!(config.best_weeks, Some(14));
        assert_eq!(config.max_age, 30);

        let every_week = OptimizerConfig::from_vars(|key| (key == "OPTIMIZER_BEST_WEEKS").then(String::new)).unwrap();
        assert_eq!(every_week.best_weeks, None);
    }

    #[test]
    fn test_from_vars_rejects_unparsable_values() {
        for key in ["OPTIMIZER_CANDIDATE_LIMIT", "OPTIMIZER_EVALUATION_WEEKS", "OPTIMIZER_BEST_WEEKS", "OPTIMIZER_MAX_AGE"] {
            let result = OptimizerConfig::from_vars(|k| (k == key).then(|| "many".to_string()));
            assert!(matches!(result, Err(OptimizerError::Config(_))), "{key} accepted 'many'");
        }
        let zero = OptimizerConfig::from_vars(|k| (k == "OPTIMIZER_CANDIDATE_LIMIT").then(|| "0".to_string()));
        assert!(zero.is_err());
    }

    #[test]
    fn test_parse_league_settings() {
        let toml = r#"
league_name = "One Street Bowl"
my_team = "1121497299739418624"

[[teams]]
id = "1121497299739418624"
name = "Gridiron Gurus"
draft_slot = 3

[[teams]]
id = "884"
name = "Rival"

[positions.QB]
start = 1
draft = 2

[positions.RB]
start = 3
draft = 5
"#;
        let settings = LeagueSettings::from_toml_str(toml).unwrap();
        assert_eq!(settings.my_team, TeamId::from("1121497299739418624"));
        assert_eq!(settings.positions[&Position::RB], PositionSettings { start: 3, draft: 5 });
        assert_eq!(settings.recommendations_per_position, 4);
        assert_eq!(settings.teams.len(), 2);
        assert_eq!(settings.teams[0].draft_slot, Some(3));
        assert_eq!(settings.teams[1].draft_slot, None);
    }

    #[test]
    fn test_league_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("league.toml");
        std::fs::write(&path, "my_team = \"me\"\n\n[positions.K]\nstart = 1\ndraft = 1\n").unwrap();

        let settings = LeagueSettings::from_file(&path).unwrap();
        assert_eq!(settings.positions[&Position::K], PositionSettings { start: 1, draft: 1 });
        assert!(LeagueSettings::from_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_reject_duplicate_draft_slot() {
        let toml = r#"
my_team = "a"

[[teams]]
id = "a"
name = "A"
draft_slot = 1

[[teams]]
id = "b"
name = "B"
draft_slot = 1

[positions.K]
start = 1
draft = 1
"#;
        assert!(matches!(LeagueSettings::from_toml_str(toml), Err(OptimizerError::Config(_))));
    }

    #[test]
    fn test_reject_start_above_draft() {
        let toml = r#"
my_team = "me"

[positions.WR]
start = 4
draft = 3
"#;
        assert!(LeagueSettings::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_standard_settings() {
        let settings = LeagueSettings::standard(TeamId::from("me"));
        assert_eq!(settings.positions.len(), 5);
        assert!(settings.validate().is_ok());
    }
}
