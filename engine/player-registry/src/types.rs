use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

/// Number of weeks in a regular season schedule (including the bye)
pub const SEASON_WEEKS: usize = 18;

/// Number of games a player is projected to play in a full season
pub const SEASON_GAMES: f64 = 17.0;

/// Unique player identifier (the Sleeper player id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PlayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Fantasy team identifier (the league user id of the owner)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TeamId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Fantasy position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DEF,
    Other,
}

impl Position {
    /// Positions that receive a positional rank
    pub const RANKED: [Position; 5] =
        [Position::QB, Position::RB, Position::WR, Position::TE, Position::K];

    /// Display order used when sorting mixed-position lists
    pub fn order(self) -> u32 {
        match self {
            Position::QB => 1,
            Position::RB => 2,
            Position::WR => 3,
            Position::TE => 4,
            Position::K => 5,
            Position::DEF | Position::Other => 10,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::K => "K",
            Position::DEF => "DEF",
            Position::Other => "OTHER",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = std::convert::Infallible;

    /// Maps depth-chart positions onto fantasy positions; never fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "QB" => Position::QB,
            "RB" | "FB" => Position::RB,
            "WR" | "LWR" | "RWR" | "SWR" => Position::WR,
            "TE" => Position::TE,
            "K" | "K/P" | "PK" => Position::K,
            "DEF" | "DST" | "D/ST" => Position::DEF,
            _ => Position::Other,
        })
    }
}

/// Matchup favorability for one week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    /// No game this week
    Bye,
    /// Favorability on a 1 (hardest) to 5 (easiest) star scale
    Stars(u8),
}

impl Rating {
    /// Build a validated star rating
    pub fn stars(stars: u8) -> Result<Self, RegistryError> {
        if (1..=5).contains(&stars) {
            Ok(Rating::Stars(stars))
        } else {
            Err(RegistryError::InvalidRating { stars })
        }
    }

    /// Favorability weight, BYE counts as zero
    pub fn favorability(self) -> u32 {
        match self {
            Rating::Bye => 0,
            Rating::Stars(stars) => stars as u32,
        }
    }

    pub fn is_bye(self) -> bool {
        matches!(self, Rating::Bye)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Bye => f.write_str("BYE"),
            Rating::Stars(stars) => write!(f, "{stars}"),
        }
    }
}

/// One week of a player's schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub week: u32,

    /// Opponent abbreviation, `None` on a bye
    pub opponent: Option<String>,

    /// Whether the game is played at the opponent's stadium
    pub away: bool,

    pub rating: Rating,
}

impl Matchup {
    pub fn bye(week: u32) -> Self {
        Self { week, opponent: None, away: false, rating: Rating::Bye }
    }

    /// Parse a raw schedule entry: opponent is "BYE", "@BUF" (away) or "BUF" (home)
    pub fn parse(week: u32, opponent: &str, stars: u8) -> Result<Self, RegistryError> {
        let opponent = opponent.trim();
        if opponent.starts_with("BYE") {
            return Ok(Self::bye(week));
        }

        let away = opponent.starts_with('@');
        let name = opponent.trim_start_matches('@').trim();
        Ok(Self {
            week,
            opponent: Some(name.to_string()),
            away,
            rating: Rating::stars(stars)?,
        })
    }
}

impl fmt::Display for Matchup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.opponent {
            None => f.write_str("BYE"),
            Some(opponent) => {
                write!(f, "{}{} ({})", if self.away { "@" } else { "" }, opponent, self.rating)
            }
        }
    }
}

/// Kinds of external identifiers a player can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    Sleeper,
    Espn,
    Yahoo,
    Rotowire,
    Rotoworld,
    Sportradar,
    Gsis,
    FantasyData,
    Stats,
    Swish,
}

/// Who a player belongs to. Exactly one state holds at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Availability {
    /// Free agent
    #[default]
    Free,
    /// On my fantasy team
    Mine(TeamId),
    /// On an opponent's team; `None` when the drafting team could not be identified
    Taken(Option<TeamId>),
}

/// A fantasy football player with projection, schedule and roster state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    /// Full name (e.g., "Josh Allen")
    pub name: String,

    pub position: Position,

    /// NFL team abbreviation (e.g., "BUF")
    #[serde(default)]
    pub nfl_team: Option<String>,

    #[serde(default)]
    pub age: u32,

    /// Overall rank by adjusted projection (1 = best, 0 = unranked)
    #[serde(default)]
    pub rank: u32,

    /// Rank among players at the same position (1 = best, 0 = unranked)
    #[serde(default)]
    pub positional_rank: u32,

    /// Source search rank, lower is more relevant
    #[serde(default)]
    pub search_rank: Option<u32>,

    /// Season-total projected fantasy points
    #[serde(default)]
    pub projection: f64,

    /// Forecast games missed to injury
    #[serde(default)]
    pub projected_games_missed: f64,

    #[serde(default)]
    pub external_ids: BTreeMap<IdKind, String>,

    #[serde(default)]
    pub weeks: Vec<Matchup>,

    /// Expected points per week, same length as `weeks`
    #[serde(default)]
    pub week_fppgs: Vec<f64>,

    #[serde(default)]
    pub availability: Availability,

    /// Auction price paid in the live draft
    #[serde(default)]
    pub actual_cost: Option<u32>,

    #[serde(default)]
    pub actual_draft_pos: Option<u32>,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Position, projection: f64) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.into(),
            position,
            nfl_team: None,
            age: 0,
            rank: 0,
            positional_rank: 0,
            search_rank: None,
            projection,
            projected_games_missed: 0.0,
            external_ids: BTreeMap::new(),
            weeks: Vec::new(),
            week_fppgs: Vec::new(),
            availability: Availability::Free,
            actual_cost: None,
            actual_draft_pos: None,
        }
    }

    /// Expected points for week `i`, zero past the end of the schedule
    pub fn week_fppg(&self, i: usize) -> f64 {
        if i >= self.weeks.len() {
            return 0.0;
        }
        self.week_fppgs.get(i).copied().unwrap_or(0.0)
    }

    /// Projection scaled down by the forecast games missed
    pub fn adj_projection(&self) -> f64 {
        self.adjusted_projection(SEASON_GAMES)
    }

    /// Projection over a `season_games` season, games played clamped to `[0, season_games]`
    pub fn adjusted_projection(&self, season_games: f64) -> f64 {
        let played = (season_games - self.projected_games_missed).clamp(0.0, season_games);
        self.projection * played / season_games
    }

    pub fn ratings(&self) -> Vec<Rating> {
        self.weeks.iter().map(|w| w.rating).collect()
    }

    /// Replace the schedule; the weekly forecast is cleared until recomputed
    pub fn set_weeks(&mut self, weeks: Vec<Matchup>) {
        self.week_fppgs = vec![0.0; weeks.len()];
        self.weeks = weeks;
    }

    /// Replace the weekly forecast, one score per scheduled week
    pub fn set_week_fppgs(&mut self, scores: Vec<f64>) -> Result<(), RegistryError> {
        if scores.len() != self.weeks.len() {
            return Err(RegistryError::ForecastLength {
                player: self.name.clone(),
                expected: self.weeks.len(),
                actual: scores.len(),
            });
        }
        self.week_fppgs = scores;
        Ok(())
    }

    /// Zero the weekly forecast for the current schedule
    pub fn clear_week_fppgs(&mut self) {
        self.week_fppgs = vec![0.0; self.weeks.len()];
    }

    pub fn has_full_season(&self, weeks: usize) -> bool {
        self.weeks.len() >= weeks
    }

    pub fn last_name(&self) -> &str {
        self.name.split_whitespace().last().unwrap_or("")
    }

    /// On my team
    pub fn is_picked(&self) -> bool {
        matches!(self.availability, Availability::Mine(_))
    }

    /// On somebody else's team
    pub fn is_taken(&self) -> bool {
        matches!(self.availability, Availability::Taken(_))
    }

    pub fn is_free(&self) -> bool {
        matches!(self.availability, Availability::Free)
    }

    pub fn fantasy_team(&self) -> Option<&TeamId> {
        match &self.availability {
            Availability::Mine(team) => Some(team),
            Availability::Taken(team) => team.as_ref(),
            Availability::Free => None,
        }
    }

    pub fn external_id(&self, kind: IdKind) -> Option<&str> {
        self.external_ids.get(&kind).map(String::as_str)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{} ({}) {:.1} pts",
            self.position,
            self.name,
            self.nfl_team.as_deref().map(|t| format!(" {t}")).unwrap_or_default(),
            self.positional_rank,
            self.projection
        )
    }
}
