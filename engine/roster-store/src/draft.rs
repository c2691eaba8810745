//! Live draft picks in the Sleeper `/draft/{id}/picks` schema

use player_registry::{PlayerId, TeamId};
use serde::{Deserialize, Deserializer, Serialize};

/// One pick of a live draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPick {
    pub pick_no: u32,
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub draft_slot: Option<u32>,

    /// Owner's user id, empty or null when the pick was made for an open slot
    #[serde(default, deserialize_with = "empty_as_none")]
    pub picked_by: Option<String>,

    pub metadata: PickMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickMetadata {
    pub player_id: String,

    /// Auction price, sent as a string
    #[serde(default, deserialize_with = "empty_as_none")]
    pub amount: Option<String>,
}

impl DraftPick {
    pub fn cost(&self) -> Option<u32> {
        self.metadata.amount.as_deref().and_then(|a| a.trim().parse().ok())
    }
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// What applying a pick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// Player moved onto a known fantasy team
    Rostered { player: PlayerId, team: TeamId },
    /// Drafting team could not be identified
    TakenByUnknown { player: PlayerId },
    /// Owner unknown and the player already belongs to a team, left as is
    Kept { player: PlayerId },
    /// Player id not in the registry
    UnknownPlayer { player_id: String },
}

/// Progress through a live draft's pick list
#[derive(Debug, Clone, Default)]
pub struct DraftBoard {
    applied: usize,
}

impl DraftBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks seen so far
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// The picks not yet applied, and mark them seen
    pub fn take_new<'a>(&mut self, picks: &'a [DraftPick]) -> &'a [DraftPick] {
        let start = self.applied.min(picks.len());
        self.applied = self.applied.max(picks.len());
        &picks[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picks_json() -> &'static str {
        r#"[
            {"pick_no": 1, "round": 1, "draft_slot": 3, "picked_by": "42",
             "metadata": {"player_id": "4984", "amount": "57", "first_name": "Josh"}},
            {"pick_no": 2, "round": 1, "draft_slot": 5, "picked_by": "",
             "metadata": {"player_id": "6794"}}
        ]"#
    }

    #[test]
    fn test_parse_picks() {
        let picks: Vec<DraftPick> = serde_json::from_str(picks_json()).unwrap();
        assert_eq!(picks[0].picked_by.as_deref(), Some("42"));
        assert_eq!(picks[0].cost(), Some(57));
        assert_eq!(picks[1].picked_by, None);
        assert_eq!(picks[1].cost(), None);
        assert_eq!(picks[1].draft_slot, Some(5));
    }

    #[test]
    fn test_board_only_returns_new_picks() {
        let picks: Vec<DraftPick> = serde_json::from_str(picks_json()).unwrap();
        let mut board = DraftBoard::new();

        assert_eq!(board.take_new(&picks[..1]).len(), 1);
        let new = board.take_new(&picks);
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].pick_no, 2);
        assert!(board.take_new(&picks).is_empty());
        assert_eq!(board.applied(), 2);
    }
}
