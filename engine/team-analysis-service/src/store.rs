//! Storage seam between the analysis service and whoever owns team data
//!
//! Stores hand out owned roster snapshots and accept whole-set replacements;
//! the service never holds a live handle into storage while it computes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use lineup_engine::{PlayerId, RoomId, RosterEntry, TeamId, TeamRating};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Stored rating for one team; at most one per team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRatingRecord {
    pub team_id: TeamId,
    pub rating: TeamRating,
    pub calculated_at: DateTime<Utc>,
}

/// Team storage used by the analysis service
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Teams of a room in creation order
    async fn room_teams(&self, room_id: RoomId) -> Result<Vec<TeamId>>;

    /// Roster entries of a team in creation order
    async fn load_roster(&self, team_id: TeamId) -> Result<Vec<RosterEntry>>;

    /// Flag exactly `player_ids` as the playing XI and clear every other entry.
    /// An impact flag held by a player entering the XI is cleared with it.
    async fn replace_lineup(&self, team_id: TeamId, player_ids: &[PlayerId]) -> Result<()>;

    /// Clear the impact flag on the whole team, then set it on `player_id`
    async fn replace_impact_player(&self, team_id: TeamId, player_id: Option<PlayerId>)
        -> Result<()>;

    /// Create or overwrite the team's rating
    async fn upsert_rating(&self, record: &TeamRatingRecord) -> Result<()>;

    /// Remove the team's rating, if any
    async fn clear_rating(&self, team_id: TeamId) -> Result<()>;

    async fn rating(&self, team_id: TeamId) -> Result<Option<TeamRatingRecord>>;
}

/// In-memory team store
#[derive(Debug, Default)]
pub struct InMemoryTeamStore {
    rooms: DashMap<RoomId, Vec<TeamId>>,
    rosters: DashMap<TeamId, Vec<RosterEntry>>,
    ratings: DashMap<TeamId, TeamRatingRecord>,
}

impl InMemoryTeamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty team in a room
    pub fn add_team(&self, room_id: RoomId, team_id: TeamId) {
        let mut teams = self.rooms.entry(room_id).or_default();
        if !teams.contains(&team_id) {
            teams.push(team_id);
        }
        self.rosters.entry(team_id).or_default();
    }

    /// Append a drafted player to its team's roster
    pub fn add_roster_entry(&self, entry: RosterEntry) -> Result<()> {
        let team_id = entry.team_id;
        let mut roster = self.rosters.get_mut(&team_id).ok_or(AnalysisError::TeamNotFound(team_id))?;
        if roster.iter().any(|e| e.player.id == entry.player.id) {
            return Err(AnalysisError::DuplicateRosterEntry { team_id, player_id: entry.player.id });
        }
        roster.push(entry);
        Ok(())
    }

    fn with_roster<T>(
        &self,
        team_id: TeamId,
        f: impl FnOnce(&mut Vec<RosterEntry>) -> T,
    ) -> Result<T> {
        let mut roster = self.rosters.get_mut(&team_id).ok_or(AnalysisError::TeamNotFound(team_id))?;
        Ok(f(roster.value_mut()))
    }
}

#[async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn room_teams(&self, room_id: RoomId) -> Result<Vec<TeamId>> {
        Ok(self.rooms.get(&room_id).map(|teams| teams.clone()).unwrap_or_default())
    }

    async fn load_roster(&self, team_id: TeamId) -> Result<Vec<RosterEntry>> {
        self.rosters
            .get(&team_id)
            .map(|roster| roster.clone())
            .ok_or(AnalysisError::TeamNotFound(team_id))
    }

    async fn replace_lineup(&self, team_id: TeamId, player_ids: &[PlayerId]) -> Result<()> {
        self.with_roster(team_id, |roster| lineup_engine::apply_lineup(roster, player_ids))
    }

    async fn replace_impact_player(
        &self,
        team_id: TeamId,
        player_id: Option<PlayerId>,
    ) -> Result<()> {
        self.with_roster(team_id, |roster| {
            if let Some(id) = player_id {
                if !roster.iter().any(|e| e.player.id == id && !e.in_playing_xi) {
                    return Err(AnalysisError::persistence(
                        team_id,
                        "impact player",
                        format!("player {id} is not on the bench"),
                    ));
                }
            }
            lineup_engine::apply_impact_player(roster, player_id);
            Ok(())
        })?
    }

    async fn upsert_rating(&self, record: &TeamRatingRecord) -> Result<()> {
        if !self.rosters.contains_key(&record.team_id) {
            return Err(AnalysisError::TeamNotFound(record.team_id));
        }
        self.ratings.insert(record.team_id, record.clone());
        Ok(())
    }

    async fn clear_rating(&self, team_id: TeamId) -> Result<()> {
        self.ratings.remove(&team_id);
        Ok(())
    }

    async fn rating(&self, team_id: TeamId) -> Result<Option<TeamRatingRecord>> {
        Ok(self.ratings.get(&team_id).map(|r| r.clone()))
    }
}
