//! Postgres-backed team store
//!
//! Queries are built at runtime with `sqlx::query` so the crate builds without a
//! live database. Every write runs in its own transaction.

use async_trait::async_trait;
use lineup_engine::{Player, PlayerId, PlayerRole, RoomId, RosterEntry, TeamId, TeamRating};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::error::{AnalysisError, Result};
use crate::store::{TeamRatingRecord, TeamStore};

const ROSTER_QUERY: &str = "SELECT tp.team_id, tp.price, tp.in_playing_xi, tp.is_impact_player, \
     p.id, p.name, p.role, p.country, p.base_price, \
     p.batting_score, p.bowling_score, p.overall_score, p.is_overseas \
     FROM team_players tp JOIN players p ON p.id = tp.player_id \
     WHERE tp.team_id = $1 ORDER BY tp.added_at, tp.id";

/// Team store over a Postgres connection pool
#[derive(Clone)]
pub struct PgTeamStore {
    pool: PgPool,
}

impl PgTeamStore {
    /// Open a pool and optionally bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool =
            PgPoolOptions::new().max_connections(config.max_connections).connect(&config.url).await?;

        if config.run_migrations {
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Team analysis migrations applied");
        }

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn ensure_team(&self, team_id: TeamId) -> Result<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM teams WHERE id = $1)")
            .bind(team_id)
            .fetch_one(&self.pool)
            .await?;
        if exists {
            Ok(())
        } else {
            Err(AnalysisError::TeamNotFound(team_id))
        }
    }
}

fn roster_entry(row: &PgRow) -> Result<RosterEntry> {
    let role: String = row.try_get("role")?;
    let player = Player {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        role: role.parse::<PlayerRole>()?,
        country: row.try_get("country")?,
        base_price: row.try_get::<Decimal, _>("base_price")?,
        batting_score: row.try_get("batting_score")?,
        bowling_score: row.try_get("bowling_score")?,
        overall_score: row.try_get("overall_score")?,
        is_overseas: row.try_get("is_overseas")?,
    };
    Ok(RosterEntry {
        team_id: row.try_get("team_id")?,
        player,
        price: row.try_get("price")?,
        in_playing_xi: row.try_get("in_playing_xi")?,
        is_impact_player: row.try_get("is_impact_player")?,
    })
}

#[async_trait]
impl TeamStore for PgTeamStore {
    async fn room_teams(&self, room_id: RoomId) -> Result<Vec<TeamId>> {
        let teams: Vec<TeamId> =
            sqlx::query_scalar("SELECT id FROM teams WHERE room_id = $1 ORDER BY created_at, id")
                .bind(room_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(teams)
    }

    async fn load_roster(&self, team_id: TeamId) -> Result<Vec<RosterEntry>> {
        self.ensure_team(team_id).await?;
        let rows = sqlx::query(ROSTER_QUERY).bind(team_id).fetch_all(&self.pool).await?;
        rows.iter().map(roster_entry).collect()
    }

    async fn replace_lineup(&self, team_id: TeamId, player_ids: &[PlayerId]) -> Result<()> {
        let persist = |e: sqlx::Error| AnalysisError::persistence(team_id, "playing XI", e);

        let mut tx = self.pool.begin().await.map_err(persist)?;
        sqlx::query(
            "UPDATE team_players SET in_playing_xi = (player_id = ANY($2)), \
             is_impact_player = is_impact_player AND NOT (player_id = ANY($2)) \
             WHERE team_id = $1",
        )
        .bind(team_id)
        .bind(player_ids)
        .execute(&mut *tx)
        .await
        .map_err(persist)?;
        tx.commit().await.map_err(persist)?;

        debug!(team_id, selected = player_ids.len(), "Playing XI flags written");
        Ok(())
    }

    async fn replace_impact_player(
        &self,
        team_id: TeamId,
        player_id: Option<PlayerId>,
    ) -> Result<()> {
        let persist = |e: sqlx::Error| AnalysisError::persistence(team_id, "impact player", e);

        let mut tx = self.pool.begin().await.map_err(persist)?;
        sqlx::query("UPDATE team_players SET is_impact_player = FALSE WHERE team_id = $1")
            .bind(team_id)
            .execute(&mut *tx)
            .await
            .map_err(persist)?;

        if let Some(id) = player_id {
            let updated = sqlx::query(
                "UPDATE team_players SET is_impact_player = TRUE \
                 WHERE team_id = $1 AND player_id = $2 AND NOT in_playing_xi",
            )
            .bind(team_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(persist)?;

            if updated.rows_affected() != 1 {
                // Dropping the transaction rolls back the clear above
                return Err(AnalysisError::persistence(
                    team_id,
                    "impact player",
                    format!("player {id} is not on the bench"),
                ));
            }
        }
        tx.commit().await.map_err(persist)?;
        Ok(())
    }

    async fn upsert_rating(&self, record: &TeamRatingRecord) -> Result<()> {
        let team_id = record.team_id;
        let rating = &record.rating;
        sqlx::query(
            "INSERT INTO team_ratings (team_id, overall_rating, batting_rating, bowling_rating, \
             balance_score, bench_depth, role_coverage, calculated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (team_id) DO UPDATE SET \
             overall_rating = EXCLUDED.overall_rating, \
             batting_rating = EXCLUDED.batting_rating, \
             bowling_rating = EXCLUDED.bowling_rating, \
             balance_score = EXCLUDED.balance_score, \
             bench_depth = EXCLUDED.bench_depth, \
             role_coverage = EXCLUDED.role_coverage, \
             calculated_at = EXCLUDED.calculated_at",
        )
        .bind(team_id)
        .bind(rating.overall_rating)
        .bind(rating.batting_rating)
        .bind(rating.bowling_rating)
        .bind(rating.balance_score)
        .bind(rating.bench_depth)
        .bind(rating.role_coverage)
        .bind(record.calculated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AnalysisError::persistence(team_id, "team rating", e))?;
        Ok(())
    }

    async fn clear_rating(&self, team_id: TeamId) -> Result<()> {
        sqlx::query("DELETE FROM team_ratings WHERE team_id = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AnalysisError::persistence(team_id, "team rating", e))?;
        Ok(())
    }

    async fn rating(&self, team_id: TeamId) -> Result<Option<TeamRatingRecord>> {
        let row = sqlx::query(
            "SELECT overall_rating, batting_rating, bowling_rating, balance_score, \
             bench_depth, role_coverage, calculated_at FROM team_ratings WHERE team_id = $1",
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(TeamRatingRecord {
                team_id,
                rating: TeamRating {
                    overall_rating: row.try_get("overall_rating")?,
                    batting_rating: row.try_get("batting_rating")?,
                    bowling_rating: row.try_get("bowling_rating")?,
                    balance_score: row.try_get("balance_score")?,
                    bench_depth: row.try_get("bench_depth")?,
                    role_coverage: row.try_get("role_coverage")?,
                },
                calculated_at: row.try_get("calculated_at")?,
            })
        })
        .transpose()
    }
}
