//! Background draft poller

use crate::config::PollerConfig;
use crate::draft::{DraftBoard, DraftPick, PickOutcome};
use crate::error::{Result, RosterError};
use crate::store::RosterStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Source of the live draft's pick list
#[async_trait::async_trait]
pub trait PickFeed: Send + Sync {
    /// Every pick made so far, in pick order
    async fn fetch(&self) -> Result<Vec<DraftPick>>;
}

/// Picks read from a local JSON file kept current by an external fetcher
#[derive(Debug, Clone)]
pub struct FilePickFeed {
    path: PathBuf,
}

impl FilePickFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl PickFeed for FilePickFeed {
    async fn fetch(&self) -> Result<Vec<DraftPick>> {
        if !tokio::fs::try_exists(&self.path).await? {
            warn!("Could not load draft from {}", self.path.display());
            return Ok(Vec::new());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        serde_json::from_str(&content)
            .map_err(|e| RosterError::Feed { message: format!("{}: {}", self.path.display(), e) })
    }
}

/// Applies new picks from a feed to the roster store on a fixed interval
pub struct DraftPoller {
    store: RosterStore,
    feed: Arc<dyn PickFeed>,
    board: DraftBoard,
    config: PollerConfig,
}

impl DraftPoller {
    pub fn new(store: RosterStore, feed: Arc<dyn PickFeed>, config: PollerConfig) -> Self {
        Self { store, feed, board: DraftBoard::new(), config }
    }

    /// Picks applied so far
    pub fn applied(&self) -> usize {
        self.board.applied()
    }

    /// Fetch the pick list once and apply what is new
    pub async fn refresh_once(&mut self) -> Result<Vec<PickOutcome>> {
        debug!("Refreshing draft picks...");
        let picks = self.feed.fetch().await?;
        let outcomes = self.store.apply_picks(&mut self.board, &picks)?;
        if !outcomes.is_empty() {
            info!("Applied {} new draft picks ({} total)", outcomes.len(), self.board.applied());
        }
        Ok(outcomes)
    }

    /// Refresh, then sleep, forever. Abort the handle to stop.
    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                if let Err(e) = self.refresh_once().await {
                    warn!("Draft refresh failed: {}", e);
                }
                tokio::time::sleep(self.config.refresh_interval()).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use player_registry::{Player, PlayerId, PlayerRegistry, Position, TeamId};
    use std::time::Duration;

    fn store() -> RosterStore {
        let registry = PlayerRegistry::from_players([
            Player::new("4984", "Josh Allen", Position::QB, 340.0),
            Player::new("6794", "Justin Jefferson", Position::WR, 290.0),
        ]);
        let store = RosterStore::new(registry, TeamId::from("me"));
        store.add_team(TeamId::from("rival"), "Rival", Some(2));
        store
    }

    const ONE_PICK: &str = r#"[
        {"pick_no": 1, "round": 1, "draft_slot": 2, "picked_by": "rival", "metadata": {"player_id": "4984"}}
    ]"#;

    const TWO_PICKS: &str = r#"[
        {"pick_no": 1, "round": 1, "draft_slot": 2, "picked_by": "rival", "metadata": {"player_id": "4984"}},
        {"pick_no": 2, "round": 1, "draft_slot": 1, "picked_by": "me", "metadata": {"player_id": "6794", "amount": "40"}}
    ]"#;

    #[tokio::test]
    async fn test_refresh_applies_only_new_picks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picks.json");
        std::fs::write(&path, ONE_PICK).unwrap();

        let store = store();
        let mut poller = DraftPoller::new(store.clone(), Arc::new(FilePickFeed::new(&path)), PollerConfig::default());

        assert_eq!(poller.refresh_once().await.unwrap().len(), 1);
        assert!(store.player(&PlayerId::from("4984")).unwrap().is_taken());

        std::fs::write(&path, TWO_PICKS).unwrap();
        let outcomes = poller.refresh_once().await.unwrap();
        assert_eq!(outcomes, vec![PickOutcome::Rostered { player: PlayerId::from("6794"), team: TeamId::from("me") }]);
        assert_eq!(poller.applied(), 2);
        assert_eq!(store.player(&PlayerId::from("6794")).unwrap().actual_cost, Some(40));
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let feed = FilePickFeed::new(dir.path().join("picks.json"));
        assert!(feed.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_feed_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picks.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut poller = DraftPoller::new(store(), Arc::new(FilePickFeed::new(&path)), PollerConfig::default());
        assert!(matches!(poller.refresh_once().await, Err(RosterError::Feed { .. })));
        assert_eq!(poller.applied(), 0);
    }

    /// In-memory feed the test appends picks to
    #[derive(Default)]
    struct SharedFeed {
        picks: parking_lot::Mutex<Vec<DraftPick>>,
    }

    #[async_trait::async_trait]
    impl PickFeed for SharedFeed {
        async fn fetch(&self) -> Result<Vec<DraftPick>> {
            Ok(self.picks.lock().clone())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_poller_keeps_refreshing() {
        let store = store();
        let feed = Arc::new(SharedFeed::default());
        let config = PollerConfig { refresh_interval_secs: 15 };
        let handle = DraftPoller::new(store.clone(), feed.clone(), config).spawn();

        // First refresh sees an empty draft
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(store.player(&PlayerId::from("4984")).unwrap().is_free());

        *feed.picks.lock() = serde_json::from_str(ONE_PICK).unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(store.player(&PlayerId::from("4984")).unwrap().is_free());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(store.player(&PlayerId::from("4984")).unwrap().is_taken());

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
    }
}
