//! # Team Analysis Service
//!
//! Runs the lineup engine over stored auction rosters: selects each team's
//! playing XI and impact player, stores team ratings and ranks the teams of a
//! room. Storage sits behind [`TeamStore`], with an in-memory store for tests
//! and snapshot files and a Postgres store for live rooms.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod postgres;
pub mod roster_file;
pub mod service;
pub mod store;

pub use config::{load_config, AnalysisServiceConfig, DatabaseConfig, LoggingConfig};
pub use error::{AnalysisError, Result};
pub use postgres::PgTeamStore;
pub use roster_file::{RoomSnapshot, SnapshotPlayer, TeamSnapshot};
pub use service::{RoomAnalysis, TeamAnalysis, TeamAnalysisService};
pub use store::{InMemoryTeamStore, TeamRatingRecord, TeamStore};
