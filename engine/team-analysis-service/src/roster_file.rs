//! JSON room snapshots for offline analysis
//!
//! A snapshot lists the teams of one finished auction room and the players each
//! team bought. Optional fields are derived the same way the player scraper
//! derives them: `overall_score` from the role-weighted composite,
//! `is_overseas` from the country, and `price` from the base price.

use std::path::Path;

use lineup_engine::{Player, PlayerId, PlayerRole, RoomId, RosterEntry, TeamId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::store::InMemoryTeamStore;

/// Players from this country do not count against the overseas cap
pub const HOME_COUNTRY: &str = "India";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub teams: Vec<TeamSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub team_id: TeamId,
    #[serde(default)]
    pub team_name: Option<String>,
    pub players: Vec<SnapshotPlayer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPlayer {
    pub id: PlayerId,
    pub name: String,
    pub role: PlayerRole,
    pub country: String,
    pub base_price: Decimal,
    pub batting_score: f64,
    pub bowling_score: f64,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub is_overseas: Option<bool>,
    /// Winning bid; defaults to the base price
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl SnapshotPlayer {
    fn into_entry(self, team_id: TeamId) -> RosterEntry {
        let is_overseas = self.is_overseas.unwrap_or(self.country != HOME_COUNTRY);
        let price = self.price.unwrap_or(self.base_price);
        let mut player = Player::with_composite_score(
            self.id,
            self.name,
            self.role,
            self.country,
            self.base_price,
            self.batting_score,
            self.bowling_score,
            is_overseas,
        );
        if let Some(overall) = self.overall_score {
            player.overall_score = overall;
        }
        RosterEntry::new(team_id, player, price)
    }
}

impl RoomSnapshot {
    /// Read a snapshot from a JSON file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Loading room snapshot from: {:?}", path.as_ref());
        let json_content = tokio::fs::read_to_string(&path).await?;
        let snapshot: RoomSnapshot = serde_json::from_str(&json_content)?;
        info!(room_id = snapshot.room_id, teams = snapshot.teams.len(), "Room snapshot loaded");
        Ok(snapshot)
    }

    /// Display name of a team, if the snapshot carries one
    pub fn team_name(&self, team_id: TeamId) -> Option<&str> {
        self.teams.iter().find(|t| t.team_id == team_id).and_then(|t| t.team_name.as_deref())
    }

    /// Build an in-memory store holding every team of the snapshot
    pub fn to_store(&self) -> Result<InMemoryTeamStore> {
        let store = InMemoryTeamStore::new();
        for team in &self.teams {
            store.add_team(self.room_id, team.team_id);
            for player in &team.players {
                store.add_roster_entry(player.clone().into_entry(team.team_id))?;
            }
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::store::TeamStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{
        "room_id": 4,
        "teams": [
            {
                "team_id": 40,
                "team_name": "Chennai Strikers",
                "players": [
                    {"id": 1, "name": "Keeper", "role": "WK", "country": "India",
                     "base_price": "2.00", "batting_score": 60.0, "bowling_score": 10.0},
                    {"id": 2, "name": "Quick", "role": "BOWL", "country": "Australia",
                     "base_price": "1.50", "batting_score": 10.0, "bowling_score": 80.0,
                     "overall_score": 75.5, "price": "4.25"}
                ]
            },
            {"team_id": 41, "players": []}
        ]
    }"#;

    fn write_snapshot(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn snapshot_fills_derived_fields() {
        let file = write_snapshot(SNAPSHOT);
        let snapshot = RoomSnapshot::load(file.path()).await.unwrap();
        assert_eq!(snapshot.team_name(40), Some("Chennai Strikers"));
        assert_eq!(snapshot.team_name(41), None);

        let store = snapshot.to_store().unwrap();
        assert_eq!(store.room_teams(4).await.unwrap(), vec![40, 41]);

        let roster = store.load_roster(40).await.unwrap();
        let keeper = &roster[0];
        assert!(!keeper.player.is_overseas);
        assert_eq!(keeper.price, Decimal::new(200, 2));
        // WK composite: 0.7 * 60 + 0.3 * 10
        assert!((keeper.player.overall_score - 45.0).abs() < 1e-9);

        let quick = &roster[1];
        assert!(quick.player.is_overseas);
        assert_eq!(quick.player.overall_score, 75.5);
        assert_eq!(quick.price, Decimal::new(425, 2));
        assert!(store.load_roster(41).await.unwrap().is_empty());
    }

    #[test]
    fn duplicate_player_in_team_is_rejected() {
        let mut snapshot: RoomSnapshot = serde_json::from_str(SNAPSHOT).unwrap();
        let dup = snapshot.teams[0].players[0].clone();
        snapshot.teams[0].players.push(dup);
        assert!(matches!(
            snapshot.to_store(),
            Err(AnalysisError::DuplicateRosterEntry { team_id: 40, player_id: 1 })
        ));
    }

    #[tokio::test]
    async fn malformed_snapshot_is_a_serialization_error() {
        let file = write_snapshot("{\"room_id\": 1}");
        assert!(matches!(RoomSnapshot::load(file.path()).await, Err(AnalysisError::Serialization(_))));

        let missing = RoomSnapshot::load("/nonexistent/room.json").await;
        assert!(matches!(missing, Err(AnalysisError::Io(_))));
    }
}
