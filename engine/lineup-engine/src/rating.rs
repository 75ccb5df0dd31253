//! Team rating
//!
//! overall = clamp(xi * avg_score_xi + balance * balance_score + bench * bench_depth, 0, 100)
//!
//! Component values are reported as computed; only the overall rating is clamped.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OptimizerError, Result};
use crate::rules::Composition;
use crate::types::{Player, TeamRating, ROLE_COUNT};

/// Upper bound of every normalized rating
pub const RATING_MAX: f64 = 100.0;

/// Weights of the overall rating components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingWeights {
    /// Weight of the XI's average overall score
    pub xi: f64,
    /// Weight of the batting/bowling balance score
    pub balance: f64,
    /// Weight of the bench depth
    pub bench: f64,
}

impl Default for RatingWeights {
    fn default() -> Self {
        Self { xi: 0.6, balance: 0.3, bench: 0.1 }
    }
}

impl RatingWeights {
    pub fn validate(&self) -> Result<()> {
        for (name, w) in [("xi", self.xi), ("balance", self.balance), ("bench", self.bench)] {
            if !w.is_finite() || w < 0.0 {
                return Err(OptimizerError::InvalidWeights(format!(
                    "{name} weight must be a non-negative finite number, got {w}"
                )));
            }
        }
        Ok(())
    }
}

/// Computes team ratings from a finalized lineup and bench
#[derive(Debug, Clone, Default)]
pub struct RatingEngine {
    weights: RatingWeights,
}

impl RatingEngine {
    pub fn new(weights: RatingWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &RatingWeights {
        &self.weights
    }

    /// Rate a team; `None` until a lineup exists
    pub fn calculate_team_rating(&self, lineup: &[Player], bench: &[Player]) -> Option<TeamRating> {
        if lineup.is_empty() {
            return None;
        }

        let batting_rating = batting_rating(lineup);
        let bowling_rating = bowling_rating(lineup);
        let balance_score = balance_score(batting_rating, bowling_rating);
        let bench_depth = bench_depth(bench);
        let role_coverage = role_coverage(lineup);
        let avg_score_xi = mean(lineup.iter().map(|p| p.overall_score));

        let raw = self.weights.xi * avg_score_xi
            + self.weights.balance * balance_score
            + self.weights.bench * bench_depth;
        let overall_rating = raw.clamp(0.0, RATING_MAX);

        debug!(
            lineup = lineup.len(),
            bench = bench.len(),
            avg_score_xi,
            raw,
            overall_rating,
            "Team rating calculated"
        );

        Some(TeamRating {
            overall_rating,
            batting_rating,
            bowling_rating,
            balance_score,
            bench_depth,
            role_coverage,
        })
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Mean batting score of batters, all-rounders and keepers; 0 when there are none
pub fn batting_rating(lineup: &[Player]) -> f64 {
    mean(lineup.iter().filter(|p| p.role.bats()).map(|p| p.batting_score))
}

/// Mean bowling score of bowlers and all-rounders; 0 when there are none
pub fn bowling_rating(lineup: &[Player]) -> f64 {
    mean(lineup.iter().filter(|p| p.role.bowls()).map(|p| p.bowling_score))
}

/// 100 * min / max of the two ratings when both are positive, else 0
pub fn balance_score(batting_rating: f64, bowling_rating: f64) -> f64 {
    if batting_rating > 0.0 && bowling_rating > 0.0 {
        RATING_MAX * batting_rating.min(bowling_rating) / batting_rating.max(bowling_rating)
    } else {
        0.0
    }
}

/// Mean overall score of the bench; 0 for an empty bench
pub fn bench_depth(bench: &[Player]) -> f64 {
    mean(bench.iter().map(|p| p.overall_score))
}

/// Share of the four roles present in the lineup, scaled to 100
pub fn role_coverage(lineup: &[Player]) -> f64 {
    RATING_MAX * Composition::of(lineup).distinct_roles() as f64 / ROLE_COUNT as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayerRole::{self, *};
    use rust_decimal::Decimal;

    fn player(id: i64, role: PlayerRole, bat: f64, bowl: f64, overall: f64) -> Player {
        Player {
            id,
            name: format!("R{id}"),
            role,
            country: "India".into(),
            base_price: Decimal::ONE,
            batting_score: bat,
            bowling_score: bowl,
            overall_score: overall,
            is_overseas: false,
        }
    }

    #[test]
    fn empty_lineup_has_no_rating() {
        assert!(RatingEngine::default().calculate_team_rating(&[], &[]).is_none());
    }

    #[test]
    fn balance_example() {
        assert!((balance_score(80.0, 40.0) - 50.0).abs() < 1e-9);
        assert!((balance_score(40.0, 80.0) - 50.0).abs() < 1e-9);
        assert_eq!(balance_score(0.0, 80.0), 0.0);
        assert_eq!(balance_score(60.0, 60.0), 100.0);
    }

    #[test]
    fn role_coverage_counts_distinct_roles() {
        let all = vec![
            player(1, Batter, 1.0, 1.0, 1.0),
            player(2, Bowler, 1.0, 1.0, 1.0),
            player(3, AllRounder, 1.0, 1.0, 1.0),
            player(4, WicketKeeper, 1.0, 1.0, 1.0),
        ];
        assert_eq!(role_coverage(&all), 100.0);
        assert_eq!(role_coverage(&all[..2]), 50.0);
    }

    #[test]
    fn components_follow_role_filters() {
        let lineup = vec![
            player(1, Batter, 80.0, 5.0, 60.0),
            player(2, WicketKeeper, 60.0, 0.0, 50.0),
            player(3, AllRounder, 40.0, 50.0, 45.0),
            player(4, Bowler, 10.0, 70.0, 55.0),
        ];
        assert!((batting_rating(&lineup) - 60.0).abs() < 1e-9);
        assert!((bowling_rating(&lineup) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn bowling_only_lineup_has_zero_batting_and_balance() {
        let lineup = vec![player(1, Bowler, 30.0, 70.0, 60.0), player(2, Bowler, 20.0, 50.0, 40.0)];
        let rating = RatingEngine::default().calculate_team_rating(&lineup, &[]).unwrap();
        assert_eq!(rating.batting_rating, 0.0);
        assert!((rating.bowling_rating - 60.0).abs() < 1e-9);
        assert_eq!(rating.balance_score, 0.0);
        assert_eq!(rating.bench_depth, 0.0);
        assert!((rating.overall_rating - 0.6 * 50.0).abs() < 1e-9);
    }

    #[test]
    fn overall_uses_weighted_formula() {
        let lineup = vec![
            player(1, Batter, 80.0, 0.0, 70.0),
            player(2, Bowler, 0.0, 40.0, 30.0),
        ];
        let bench = vec![player(3, Batter, 20.0, 0.0, 20.0), player(4, Bowler, 0.0, 40.0, 40.0)];
        let rating = RatingEngine::default().calculate_team_rating(&lineup, &bench).unwrap();

        assert!((rating.balance_score - 50.0).abs() < 1e-9);
        assert!((rating.bench_depth - 30.0).abs() < 1e-9);
        assert_eq!(rating.role_coverage, 50.0);
        let expected = 0.6 * 50.0 + 0.3 * 50.0 + 0.1 * 30.0;
        assert!((rating.overall_rating - expected).abs() < 1e-9);
    }

    #[test]
    fn overall_is_clamped() {
        let lineup = vec![player(1, AllRounder, 300.0, 300.0, 300.0)];
        let rating = RatingEngine::default().calculate_team_rating(&lineup, &[]).unwrap();
        assert_eq!(rating.overall_rating, 100.0);
        // components stay unclamped
        assert_eq!(rating.batting_rating, 300.0);

        let lineup = vec![player(1, Batter, -50.0, 0.0, -80.0)];
        let rating = RatingEngine::default().calculate_team_rating(&lineup, &[]).unwrap();
        assert_eq!(rating.overall_rating, 0.0);
    }

    #[test]
    fn weights_are_validated() {
        assert!(RatingEngine::new(RatingWeights { xi: -0.1, ..Default::default() }).is_err());
        assert!(RatingEngine::new(RatingWeights { bench: f64::NAN, ..Default::default() }).is_err());
        assert!(RatingEngine::new(RatingWeights::default()).is_ok());
    }
}
