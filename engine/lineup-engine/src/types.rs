//! Roster data model shared by the selector, bench analyzer and rating engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OptimizerError;

pub type PlayerId = i64;
pub type TeamId = i64;
pub type RoomId = i64;

/// Number of distinct playing roles
pub const ROLE_COUNT: usize = 4;

/// Playing role of a cricketer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerRole {
    #[serde(rename = "BAT")]
    Batter,
    #[serde(rename = "BOWL")]
    Bowler,
    #[serde(rename = "AR")]
    AllRounder,
    #[serde(rename = "WK")]
    WicketKeeper,
}

impl PlayerRole {
    pub const ALL: [PlayerRole; ROLE_COUNT] =
        [PlayerRole::Batter, PlayerRole::Bowler, PlayerRole::AllRounder, PlayerRole::WicketKeeper];

    /// Short code used in roster files and database rows
    pub fn code(self) -> &'static str {
        match self {
            PlayerRole::Batter => "BAT",
            PlayerRole::Bowler => "BOWL",
            PlayerRole::AllRounder => "AR",
            PlayerRole::WicketKeeper => "WK",
        }
    }

    /// Whether the role contributes to the batting rating
    pub fn bats(self) -> bool {
        matches!(self, PlayerRole::Batter | PlayerRole::AllRounder | PlayerRole::WicketKeeper)
    }

    /// Whether the role contributes to the bowling rating
    pub fn bowls(self) -> bool {
        matches!(self, PlayerRole::Bowler | PlayerRole::AllRounder)
    }

    /// (batting, bowling) weights of the role-weighted overall score
    pub fn score_weights(self) -> (f64, f64) {
        match self {
            PlayerRole::Batter => (0.8, 0.2),
            PlayerRole::Bowler => (0.2, 0.8),
            PlayerRole::AllRounder => (0.5, 0.5),
            PlayerRole::WicketKeeper => (0.7, 0.3),
        }
    }

    /// Role-weighted overall score from batting and bowling skill
    pub fn composite_score(self, batting_score: f64, bowling_score: f64) -> f64 {
        let (bat_w, bowl_w) = self.score_weights();
        batting_score * bat_w + bowling_score * bowl_w
    }

    pub(crate) fn index(self) -> usize {
        match self {
            PlayerRole::Batter => 0,
            PlayerRole::Bowler => 1,
            PlayerRole::AllRounder => 2,
            PlayerRole::WicketKeeper => 3,
        }
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PlayerRole {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BAT" => Ok(PlayerRole::Batter),
            "BOWL" => Ok(PlayerRole::Bowler),
            "AR" => Ok(PlayerRole::AllRounder),
            "WK" => Ok(PlayerRole::WicketKeeper),
            other => Err(OptimizerError::UnknownRole(other.to_string())),
        }
    }
}

/// A drafted player. Immutable once drafted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: PlayerRole,
    pub country: String,
    pub base_price: Decimal,
    pub batting_score: f64,
    pub bowling_score: f64,
    pub overall_score: f64,
    pub is_overseas: bool,
}

impl Player {
    /// Create a player whose overall score is derived from the role weights
    pub fn with_composite_score(
        id: PlayerId,
        name: impl Into<String>,
        role: PlayerRole,
        country: impl Into<String>,
        base_price: Decimal,
        batting_score: f64,
        bowling_score: f64,
        is_overseas: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role,
            country: country.into(),
            base_price,
            batting_score,
            bowling_score,
            overall_score: role.composite_score(batting_score, bowling_score),
            is_overseas,
        }
    }

    /// Reject NaN and infinite scores before they reach a comparison
    pub fn check_scores(&self) -> Result<(), OptimizerError> {
        for (field, value) in [
            ("batting_score", self.batting_score),
            ("bowling_score", self.bowling_score),
            ("overall_score", self.overall_score),
        ] {
            if !value.is_finite() {
                return Err(OptimizerError::NonFiniteScore { player_id: self.id, field });
            }
        }
        Ok(())
    }
}

/// Association between a team and a drafted player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub team_id: TeamId,
    pub player: Player,
    /// Price paid at auction
    pub price: Decimal,
    #[serde(default)]
    pub in_playing_xi: bool,
    #[serde(default)]
    pub is_impact_player: bool,
}

impl RosterEntry {
    pub fn new(team_id: TeamId, player: Player, price: Decimal) -> Self {
        Self { team_id, player, price, in_playing_xi: false, is_impact_player: false }
    }
}

/// Composite quality rating of one team
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamRating {
    pub overall_rating: f64,
    pub batting_rating: f64,
    pub bowling_rating: f64,
    pub balance_score: f64,
    pub bench_depth: f64,
    pub role_coverage: f64,
}
