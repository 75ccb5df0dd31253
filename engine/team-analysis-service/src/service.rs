//! Team analysis service
//!
//! Loads a team's roster from the store, runs the lineup engine on a detached
//! snapshot and writes the results back. All write-backs for one team run under
//! that team's lock; different teams never contend.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use futures::future::join_all;
use lineup_engine::{
    bench_of, partition, rank_teams, select_impact_player, LineupSelection, LineupSelector,
    OptimizerConfig, Player, RatingEngine, RoomId, RosterEntry, TeamId, TeamRating,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::store::{TeamRatingRecord, TeamStore};

/// Result of a full analysis of one team
#[derive(Debug, Clone, Serialize)]
pub struct TeamAnalysis {
    pub team_id: TeamId,
    pub selection: LineupSelection,
    /// Players left out of the XI, in roster order
    pub bench: Vec<Player>,
    pub impact_player: Option<Player>,
    pub rating: Option<TeamRatingRecord>,
}

/// Result of analysing every team in a room
#[derive(Debug, Clone, Serialize)]
pub struct RoomAnalysis {
    pub room_id: RoomId,
    pub teams: Vec<TeamAnalysis>,
    pub winner: Option<TeamId>,
    /// Rated teams, best first
    pub standings: Vec<(TeamId, TeamRating)>,
}

/// Post-auction analysis over a team store
pub struct TeamAnalysisService {
    store: Arc<dyn TeamStore>,
    selector: LineupSelector,
    rating_engine: RatingEngine,
    team_locks: DashMap<TeamId, Arc<Mutex<()>>>,
}

impl TeamAnalysisService {
    /// Create a service with engines built from the optimizer configuration
    pub fn new(store: Arc<dyn TeamStore>, config: &OptimizerConfig) -> Result<Self> {
        Ok(Self::with_engines(store, config.selector()?, config.rating_engine()?))
    }

    pub fn with_engines(
        store: Arc<dyn TeamStore>,
        selector: LineupSelector,
        rating_engine: RatingEngine,
    ) -> Self {
        Self { store, selector, rating_engine, team_locks: DashMap::new() }
    }

    pub fn store(&self) -> &Arc<dyn TeamStore> {
        &self.store
    }

    fn team_lock(&self, team_id: TeamId) -> Arc<Mutex<()>> {
        self.team_locks.entry(team_id).or_default().value().clone()
    }

    /// Select and store the best playing XI for a team
    pub async fn select_playing_xi(&self, team_id: TeamId) -> Result<LineupSelection> {
        let lock = self.team_lock(team_id);
        let _guard = lock.lock().await;
        self.run_selection(team_id).await
    }

    /// Pick and flag the impact player from the team's current bench
    ///
    /// Returns `None` when the team has no playing XI yet or an empty bench.
    pub async fn select_impact_player(&self, team_id: TeamId) -> Result<Option<Player>> {
        let lock = self.team_lock(team_id);
        let _guard = lock.lock().await;
        let roster = self.store.load_roster(team_id).await?;
        self.run_impact_selection(team_id, &roster).await
    }

    /// Compute and upsert the team's rating from its current flags
    ///
    /// Returns `None` when the team has no playing XI yet.
    pub async fn calculate_team_rating(&self, team_id: TeamId) -> Result<Option<TeamRatingRecord>> {
        let lock = self.team_lock(team_id);
        let _guard = lock.lock().await;
        let roster = self.store.load_roster(team_id).await?;
        self.run_rating(team_id, &roster).await
    }

    /// Lineup, impact player and rating for one team under a single lock
    #[instrument(skip(self))]
    pub async fn analyze_team(&self, team_id: TeamId) -> Result<TeamAnalysis> {
        let lock = self.team_lock(team_id);
        let _guard = lock.lock().await;

        let selection = self.run_selection(team_id).await?;
        if !selection.is_selected() {
            let roster = self.store.load_roster(team_id).await?;
            let bench = roster.into_iter().map(|e| e.player).collect();
            return Ok(TeamAnalysis { team_id, selection, bench, impact_player: None, rating: None });
        }

        let roster = self.store.load_roster(team_id).await?;
        let impact_player = self.run_impact_selection(team_id, &roster).await?;
        let rating = self.run_rating(team_id, &roster).await?;
        let (_, bench) = partition(&roster);

        Ok(TeamAnalysis { team_id, selection, bench, impact_player, rating })
    }

    /// Analyse every team of a room concurrently and rank the results
    ///
    /// Every team's analysis runs to completion and writes its own results. If
    /// any team fails, the first error is returned and no room result is built,
    /// but teams that succeeded keep their stored flags and ratings.
    #[instrument(skip(self))]
    pub async fn analyze_room(&self, room_id: RoomId) -> Result<RoomAnalysis> {
        let team_ids = self.store.room_teams(room_id).await?;
        let results = join_all(team_ids.iter().map(|&team_id| self.analyze_team(team_id))).await;

        let mut teams = Vec::with_capacity(results.len());
        for (team_id, result) in team_ids.iter().zip(results) {
            match result {
                Ok(analysis) => teams.push(analysis),
                Err(e) => {
                    warn!(room_id, team_id, error = %e, "Team analysis failed");
                    return Err(e);
                }
            }
        }

        let ratings: Vec<(TeamId, TeamRating)> = teams
            .iter()
            .filter_map(|analysis| analysis.rating.as_ref().map(|r| (analysis.team_id, r.rating)))
            .collect();
        let standings = rank_teams(&ratings);
        let winner = standings.first().map(|(team_id, _)| *team_id);

        info!(room_id, teams = teams.len(), rated = standings.len(), ?winner, "Room analysed");
        Ok(RoomAnalysis { room_id, teams, winner, standings })
    }

    /// Stored ratings of a room's teams, best first
    pub async fn standings(&self, room_id: RoomId) -> Result<Vec<(TeamId, TeamRating)>> {
        Ok(rank_teams(&self.stored_ratings(room_id).await?))
    }

    /// Team with the best stored rating in a room
    pub async fn determine_winner(&self, room_id: RoomId) -> Result<Option<TeamId>> {
        Ok(lineup_engine::determine_winner(&self.stored_ratings(room_id).await?))
    }

    async fn stored_ratings(&self, room_id: RoomId) -> Result<Vec<(TeamId, TeamRating)>> {
        let mut ratings = Vec::new();
        for team_id in self.store.room_teams(room_id).await? {
            if let Some(record) = self.store.rating(team_id).await? {
                ratings.push((team_id, record.rating));
            }
        }
        Ok(ratings)
    }

    async fn run_selection(&self, team_id: TeamId) -> Result<LineupSelection> {
        let roster = self.store.load_roster(team_id).await?;
        let selector = self.selector.clone();
        let selection =
            tokio::task::spawn_blocking(move || selector.select_lineup(&roster)).await??;

        match &selection {
            LineupSelection::Selected(lineup) => {
                self.store.replace_lineup(team_id, &lineup.player_ids()).await?;
                info!(
                    team_id,
                    total_score = lineup.total_score,
                    strategy = ?lineup.strategy,
                    "Playing XI selected"
                );
            }
            failed => {
                warn!(team_id, selection = ?failed, "No playing XI; clearing previous analysis");
                self.store.replace_lineup(team_id, &[]).await?;
                self.store.replace_impact_player(team_id, None).await?;
                self.store.clear_rating(team_id).await?;
            }
        }
        Ok(selection)
    }

    async fn run_impact_selection(
        &self,
        team_id: TeamId,
        roster: &[RosterEntry],
    ) -> Result<Option<Player>> {
        if !roster.iter().any(|e| e.in_playing_xi) {
            debug!(team_id, "No playing XI yet; impact player not computable");
            return Ok(None);
        }

        let bench = bench_of(roster);
        let impact = select_impact_player(&bench).map(|pick| pick.player.clone());
        self.store.replace_impact_player(team_id, impact.as_ref().map(|p| p.id)).await?;

        match &impact {
            Some(player) => info!(team_id, player_id = player.id, "Impact player selected"),
            None => debug!(team_id, "Empty bench; no impact player"),
        }
        Ok(impact)
    }

    async fn run_rating(
        &self,
        team_id: TeamId,
        roster: &[RosterEntry],
    ) -> Result<Option<TeamRatingRecord>> {
        let (lineup, bench) = partition(roster);
        let Some(rating) = self.rating_engine.calculate_team_rating(&lineup, &bench) else {
            debug!(team_id, "No playing XI yet; rating not computable");
            return Ok(None);
        };

        let record = TeamRatingRecord { team_id, rating, calculated_at: Utc::now() };
        self.store.upsert_rating(&record).await?;
        info!(team_id, overall = rating.overall_rating, "Team rating stored");
        Ok(Some(record))
    }
}
