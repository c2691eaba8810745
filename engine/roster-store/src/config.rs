//! Configuration for roster loading and the draft poller

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Draft poller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Seconds to sleep between refreshes
    pub refresh_interval_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self { refresh_interval_secs: 15 }
    }
}

impl PollerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from a variable lookup. Unparsable values are errors.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(secs) = var("POLLER_REFRESH_INTERVAL_SECS") {
            config.refresh_interval_secs = secs
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid POLLER_REFRESH_INTERVAL_SECS '{secs}': {e}"))?;
        }

        if config.refresh_interval_secs == 0 {
            anyhow::bail!("POLLER_REFRESH_INTERVAL_SECS must be positive");
        }
        Ok(config)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// How league rosters are read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Before the draft only keepers count as rostered
    pub pre_draft: bool,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self { pre_draft: true }
    }
}
