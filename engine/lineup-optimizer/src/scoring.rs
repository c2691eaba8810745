//! Weekly lineup scoring for a candidate group

use crate::config::OptimizerConfig;
use player_registry::Player;
use serde::Serialize;
use std::sync::Arc;

/// The players started in one week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyLineup {
    /// Zero-based week index
    pub week: usize,

    /// Indices into the owning group, best expected score first
    pub starters: Vec<usize>,

    pub points: f64,

    /// Whether this week counts toward the group total
    pub counted: bool,
}

/// Score a group: each week start the `start_size` players with the highest
/// expected score and add up their points.
///
/// Ties keep group order (the sort is stable). When `best_weeks` is set only
/// that many of the highest-scoring weeks count toward the total.
pub fn score_group(
    group: &[Arc<Player>],
    start_size: usize,
    config: &OptimizerConfig,
) -> (f64, Vec<WeeklyLineup>) {
    let mut lineups = Vec::with_capacity(config.evaluation_weeks);

    for week in 0..config.evaluation_weeks {
        let mut order: Vec<usize> = (0..group.len()).collect();
        order.sort_by(|&a, &b| group[b].week_fppg(week).total_cmp(&group[a].week_fppg(week)));
        order.truncate(start_size);

        let points: f64 = order.iter().map(|&i| group[i].week_fppg(week)).sum();
        lineups.push(WeeklyLineup { week, starters: order, points, counted: true });
    }

    if let Some(best) = config.best_weeks.filter(|&best| best < lineups.len()) {
        let mut by_points: Vec<usize> = (0..lineups.len()).collect();
        by_points.sort_by(|&a, &b| lineups[b].points.total_cmp(&lineups[a].points));
        for &dropped in &by_points[best..] {
            lineups[dropped].counted = false;
        }
    }

    let total: f64 = lineups.iter().filter(|l| l.counted).map(|l| l.points).sum();
    (total, lineups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use player_registry::{Matchup, Position};

    fn player(id: &str, scores: &[f64]) -> Arc<Player> {
        let mut p = Player::new(id, format!("Player {id}"), Position::RB, 0.0);
        p.set_weeks(
            (0..scores.len() as u32).map(|w| Matchup::parse(w, "SEA", 3).unwrap()).collect(),
        );
        p.set_week_fppgs(scores.to_vec()).unwrap();
        Arc::new(p)
    }

    fn window(weeks: usize) -> OptimizerConfig {
        OptimizerConfig { evaluation_weeks: weeks, ..Default::default() }
    }

    #[test]
    fn test_best_of_group_each_week() {
        let group = vec![player("a", &[10.0, 2.0, 5.0]), player("b", &[4.0, 8.0, 5.0])];

        let (total, lineups) = score_group(&group, 1, &window(3));
        assert_eq!(lineups[0].starters, vec![0]);
        assert_eq!(lineups[1].starters, vec![1]);
        // Tie in week 3 goes to the first player in the group
        assert_eq!(lineups[2].starters, vec![0]);
        assert!((total - 23.0).abs() < 1e-9);

        let (total, _) = score_group(&group, 2, &window(3));
        assert!((total - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_weeks_past_schedule_score_zero() {
        let group = vec![player("a", &[6.0, 6.0])];
        let (total, lineups) = score_group(&group, 1, &window(4));
        assert_eq!(lineups.len(), 4);
        assert_eq!(lineups[3].points, 0.0);
        assert!((total - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_weeks_drops_lowest() {
        let group = vec![player("a", &[1.0, 9.0, 4.0, 7.0])];
        let config = OptimizerConfig { evaluation_weeks: 4, best_weeks: Some(2), ..Default::default() };

        let (total, lineups) = score_group(&group, 1, &config);
        assert!((total - 16.0).abs() < 1e-9);
        assert_eq!(lineups.iter().filter(|l| l.counted).count(), 2);
        assert!(!lineups[0].counted);
        assert!(!lineups[2].counted);
    }
}
