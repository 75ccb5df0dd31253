//! Configuration for the lineup engine

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::lineup::{LineupSelector, DEFAULT_EXHAUSTIVE_ROSTER_LIMIT};
use crate::rating::{RatingEngine, RatingWeights};
use crate::rules::LineupRules;

/// Configuration for lineup selection and team rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Playing XI composition rules
    pub rules: LineupRules,

    /// Overall rating weights
    pub weights: RatingWeights,

    /// Largest roster searched exhaustively; bigger rosters use the bounded DP
    pub exhaustive_roster_limit: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            rules: LineupRules::default(),
            weights: RatingWeights::default(),
            exhaustive_roster_limit: DEFAULT_EXHAUSTIVE_ROSTER_LIMIT,
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<()> {
        self.rules.validate()?;
        self.weights.validate()
    }

    pub fn selector(&self) -> Result<LineupSelector> {
        LineupSelector::new(self.rules, self.exhaustive_roster_limit)
    }

    pub fn rating_engine(&self) -> Result<RatingEngine> {
        RatingEngine::new(self.weights)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: OptimizerConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
