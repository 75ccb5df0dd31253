//! Playing XI composition rules

use serde::{Deserialize, Serialize};

use crate::error::{OptimizerError, Result};
use crate::types::{Player, PlayerRole, ROLE_COUNT};

/// Default number of players in a playing XI
pub const DEFAULT_XI_SIZE: usize = 11;

/// Constraints a playing XI must satisfy
///
/// The role bounds only constrain counts; they do not have to sum to the XI
/// size; the remaining slots can be filled from any role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineupRules {
    /// Players in the XI
    pub xi_size: usize,

    /// Exact number of wicket-keepers
    pub wicket_keepers: usize,

    /// Minimum number of batters
    pub min_batters: usize,

    /// Minimum number of bowlers
    pub min_bowlers: usize,

    /// Minimum number of all-rounders
    pub min_all_rounders: usize,

    /// Maximum number of all-rounders
    pub max_all_rounders: usize,

    /// Maximum number of overseas players
    pub max_overseas: usize,
}

impl Default for LineupRules {
    fn default() -> Self {
        Self {
            xi_size: DEFAULT_XI_SIZE,
            wicket_keepers: 1,
            min_batters: 3,
            min_bowlers: 2,
            min_all_rounders: 1,
            max_all_rounders: 3,
            max_overseas: 4,
        }
    }
}

impl LineupRules {
    /// Check that at least one XI could satisfy the rules
    pub fn validate(&self) -> Result<()> {
        if self.xi_size == 0 {
            return Err(OptimizerError::InvalidRules("xi_size must be positive".to_string()));
        }
        if self.min_all_rounders > self.max_all_rounders {
            return Err(OptimizerError::InvalidRules(format!(
                "min_all_rounders ({}) exceeds max_all_rounders ({})",
                self.min_all_rounders, self.max_all_rounders
            )));
        }
        let required =
            self.wicket_keepers + self.min_batters + self.min_bowlers + self.min_all_rounders;
        if required > self.xi_size {
            return Err(OptimizerError::InvalidRules(format!(
                "role minimums need {} players but the XI holds {}",
                required, self.xi_size
            )));
        }
        Ok(())
    }

    /// Validity predicate for a candidate XI
    pub fn is_valid(&self, composition: &Composition) -> bool {
        composition.size == self.xi_size
            && composition.count(PlayerRole::WicketKeeper) == self.wicket_keepers
            && composition.count(PlayerRole::Batter) >= self.min_batters
            && composition.count(PlayerRole::Bowler) >= self.min_bowlers
            && (self.min_all_rounders..=self.max_all_rounders)
                .contains(&composition.count(PlayerRole::AllRounder))
            && composition.overseas <= self.max_overseas
    }

    /// Convenience wrapper over [`Composition::of`] and [`LineupRules::is_valid`]
    pub fn is_valid_lineup<'a>(&self, players: impl IntoIterator<Item = &'a Player>) -> bool {
        self.is_valid(&Composition::of(players))
    }
}

/// Role and overseas counts of a set of players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Composition {
    roles: [usize; ROLE_COUNT],
    pub overseas: usize,
    pub size: usize,
}

impl Composition {
    pub fn of<'a>(players: impl IntoIterator<Item = &'a Player>) -> Self {
        let mut composition = Self::default();
        for player in players {
            composition.add(player);
        }
        composition
    }

    pub fn add(&mut self, player: &Player) {
        self.roles[player.role.index()] += 1;
        if player.is_overseas {
            self.overseas += 1;
        }
        self.size += 1;
    }

    pub fn count(&self, role: PlayerRole) -> usize {
        self.roles[role.index()]
    }

    /// Number of distinct roles present
    pub fn distinct_roles(&self) -> usize {
        self.roles.iter().filter(|&&n| n > 0).count()
    }
}
