//! Error types for the lineup engine
//!
//! Expected auction states (short roster, no valid XI, empty bench) are not
//! errors; they are returned as values by the selector and analyzers.

use thiserror::Error;

use crate::types::PlayerId;

/// Result type for lineup engine operations
pub type Result<T> = std::result::Result<T, OptimizerError>;

/// Errors that can occur in the lineup engine
#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Invalid lineup rules: {0}")]
    InvalidRules(String),

    #[error("Invalid rating weights: {0}")]
    InvalidWeights(String),

    #[error("Unknown player role: {0}")]
    UnknownRole(String),

    #[error("Player {player_id} has a non-finite {field}")]
    NonFiniteScore { player_id: PlayerId, field: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}
