//! Error types for the team analysis service

use lineup_engine::{OptimizerError, PlayerId, TeamId};
use thiserror::Error;

/// Result type for team analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur in the team analysis service
///
/// Short rosters, missing lineups and empty benches are not errors. Failing to
/// write a computed result back is, and is reported as `Persistence` so callers
/// can tell it apart from a computation that had nothing to produce.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Could not persist {what} for team {team_id}: {reason}")]
    Persistence { team_id: TeamId, what: &'static str, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Player {player_id} is already on the roster of team {team_id}")]
    DuplicateRosterEntry { team_id: TeamId, player_id: PlayerId },

    #[error("Analysis task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Optimizer error: {0}")]
    Optimizer(#[from] OptimizerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Wrap a storage failure while writing `what` for a team
    pub fn persistence(team_id: TeamId, what: &'static str, reason: impl ToString) -> Self {
        Self::Persistence { team_id, what, reason: reason.to_string() }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<::config::ConfigError> for AnalysisError {
    fn from(err: ::config::ConfigError) -> Self {
        AnalysisError::Config(err.to_string())
    }
}
