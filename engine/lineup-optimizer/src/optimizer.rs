use crate::combinations::Combinations;
use crate::config::OptimizerConfig;
use crate::error::{OptimizerError, Result};
use crate::scoring::{score_group, WeeklyLineup};
use player_registry::{Player, PlayerId};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// One candidate group and its season score
#[derive(Debug, Clone)]
pub struct Combination {
    /// Newly drafted players first, then the locked players
    pub players: Vec<Arc<Player>>,
    pub total_score: f64,
    pub weekly_lineups: Vec<WeeklyLineup>,
}

impl Combination {
    pub fn player_ids(&self) -> Vec<&PlayerId> {
        self.players.iter().map(|p| &p.id).collect()
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.iter().any(|p| &p.id == id)
    }

    /// Starters for a week, best first
    pub fn starters(&self, week: usize) -> Vec<&Player> {
        self.weekly_lineups
            .get(week)
            .map(|lineup| lineup.starters.iter().map(|&i| self.players[i].as_ref()).collect())
            .unwrap_or_default()
    }

    /// Mean score over the weeks that counted
    pub fn average_per_week(&self) -> f64 {
        let counted = self.weekly_lineups.iter().filter(|l| l.counted).count();
        if counted == 0 {
            return 0.0;
        }
        self.total_score / counted as f64
    }
}

/// A position pool split into locked picks and ranked, bounded candidates
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub locked: Vec<Arc<Player>>,
    pub available: Vec<Arc<Player>>,
}

/// Lineup Combination Optimizer
#[derive(Debug, Clone, Default)]
pub struct LineupOptimizer {
    config: OptimizerConfig,
}

impl LineupOptimizer {
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Split a pool into my locked players and eligible free agents.
    ///
    /// Free agents must be within the age limit and have a full schedule.
    /// They are ordered by positional rank (unranked last, stable otherwise)
    /// and cut to the candidate limit for `draft_size`.
    pub fn partition(&self, pool: &[Player], draft_size: usize) -> Partition {
        let mut partition = Partition::default();

        for player in pool {
            if player.is_picked() {
                partition.locked.push(Arc::new(player.clone()));
                continue;
            }
            if player.is_taken()
                || player.age > self.config.max_age
                || !player.has_full_season(self.config.season_weeks)
            {
                continue;
            }
            partition.available.push(Arc::new(player.clone()));
        }

        partition
            .available
            .sort_by_key(|p| if p.positional_rank == 0 { u32::MAX } else { p.positional_rank });
        partition.available.truncate(self.config.candidate_limit_for(draft_size));
        partition
    }

    /// Rank every way of completing the locked players into a group of
    /// `draft_size`, starting `start_size` of them each week.
    ///
    /// The result is sorted ascending by total score, so the best group is
    /// last. Equal totals keep enumeration order.
    pub fn optimize(&self, pool: &[Player], draft_size: usize, start_size: usize) -> Result<Vec<Combination>> {
        if draft_size == 0 {
            return Err(OptimizerError::InvalidInput { reason: "draft size must be positive".to_string() });
        }
        if start_size == 0 || start_size > draft_size {
            return Err(OptimizerError::InvalidInput {
                reason: format!("start size {start_size} must be between 1 and draft size {draft_size}"),
            });
        }

        let Partition { locked, available } = self.partition(pool, draft_size);
        if locked.len() > draft_size {
            return Err(OptimizerError::TooManyLocked { locked: locked.len(), draft_size });
        }

        let needed = draft_size - locked.len();
        if needed > 0 && available.is_empty() {
            return Err(OptimizerError::EmptyPool { needed });
        }

        info!(
            "Optimizing {} of {} candidates with {} locked (draft {}, start {})",
            needed,
            available.len(),
            locked.len(),
            draft_size,
            start_size
        );

        let subsets: Vec<Vec<usize>> = Combinations::new(available.len(), needed).collect();
        let mut combinations: Vec<Combination> = subsets
            .par_iter()
            .map(|subset| {
                let players: Vec<Arc<Player>> = subset
                    .iter()
                    .map(|&i| Arc::clone(&available[i]))
                    .chain(locked.iter().cloned())
                    .collect();
                let (total_score, weekly_lineups) = score_group(&players, start_size, &self.config);
                Combination { players, total_score, weekly_lineups }
            })
            .collect();

        combinations.sort_by(|a, b| a.total_score.total_cmp(&b.total_score));

        debug!(
            "Evaluated {} combinations, best total {:.2}",
            combinations.len(),
            combinations.last().map(|c| c.total_score).unwrap_or(0.0)
        );
        Ok(combinations)
    }
}

/// Optimize with the default configuration
pub fn optimize(pool: &[Player], draft_size: usize, start_size: usize) -> Result<Vec<Combination>> {
    LineupOptimizer::default().optimize(pool, draft_size, start_size)
}
