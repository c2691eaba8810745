//! Sleeper league documents: users become fantasy teams, rosters carry keepers

use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

/// A league member from `/league/{id}/users`
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperUser {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A roster from `/league/{id}/rosters`
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperRoster {
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub players: Option<Vec<String>>,
    #[serde(default)]
    pub keepers: Option<Vec<String>>,
}

impl SleeperRoster {
    /// Keepers before the draft, the full roster afterwards
    pub fn rostered(&self, pre_draft: bool) -> &[String] {
        let field = if pre_draft { &self.keepers } else { &self.players };
        field.as_deref().unwrap_or(&[])
    }
}

pub async fn load_users<P: AsRef<Path>>(path: P) -> Result<Vec<SleeperUser>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

pub async fn load_rosters<P: AsRef<Path>>(path: P) -> Result<Vec<SleeperRoster>> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}
