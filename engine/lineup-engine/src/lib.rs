//! # Lineup Engine
//!
//! Post-auction team analysis for the mock cricket auction. Given a team's
//! roster snapshot it selects the best valid playing XI, picks the bench impact
//! player and computes a weighted team rating.
//!
//! Everything here is pure and synchronous: callers pass detached roster
//! snapshots in and persist the returned results themselves.

pub mod bench;
pub mod config;
pub mod error;
pub mod lineup;
pub mod rating;
pub mod rules;
pub mod standings;
pub mod types;

#[cfg(test)]
mod tests;

pub use bench::{apply_impact_player, bench_of, partition, select_impact_player, ImpactPick};
pub use config::OptimizerConfig;
pub use error::{OptimizerError, Result};
pub use lineup::{
    apply_lineup, Lineup, LineupSelection, LineupSelector, SearchStrategy,
    DEFAULT_EXHAUSTIVE_ROSTER_LIMIT,
};
pub use rating::{RatingEngine, RatingWeights};
pub use rules::{Composition, LineupRules};
pub use standings::{determine_winner, rank_teams};
pub use types::{Player, PlayerId, PlayerRole, RoomId, RosterEntry, TeamId, TeamRating};
