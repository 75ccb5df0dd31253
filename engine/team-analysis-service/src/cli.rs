//! # Command Line Interface
//!
//! Runs team analysis against a JSON room snapshot or the Postgres store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lineup_engine::{LineupSelection, Player, RoomId, TeamId, TeamRating};

use crate::config::AnalysisServiceConfig;
use crate::postgres::PgTeamStore;
use crate::roster_file::RoomSnapshot;
use crate::service::{RoomAnalysis, TeamAnalysis, TeamAnalysisService};
use crate::store::TeamStore;

/// Post-auction team analysis
#[derive(Parser)]
#[command(name = "team-analysis")]
#[command(about = "Playing XI, impact player and team ratings for mock auction rooms")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyse every team in a JSON room snapshot
    Analyze {
        /// Room snapshot file
        #[arg(long)]
        roster: PathBuf,
    },
    /// Analyse every team of a room in the database and store the results
    Room {
        /// Room id
        #[arg(long)]
        room: RoomId,
    },
    /// Show the stored rating of a team
    Rating {
        /// Team id
        #[arg(long)]
        team: TeamId,
    },
}

/// CLI handler
pub struct CliHandler {
    config: AnalysisServiceConfig,
    json: bool,
}

impl CliHandler {
    pub fn new(config: AnalysisServiceConfig, json: bool) -> Self {
        Self { config, json }
    }

    /// Handle CLI commands
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Analyze { roster } => self.analyze_snapshot(&roster).await,
            Commands::Room { room } => self.analyze_room(room).await,
            Commands::Rating { team } => self.show_rating(team).await,
        }
    }

    async fn analyze_snapshot(&self, path: &Path) -> Result<()> {
        let snapshot = RoomSnapshot::load(path)
            .await
            .with_context(|| format!("Failed to load room snapshot {}", path.display()))?;
        let store = Arc::new(snapshot.to_store()?);
        let service = TeamAnalysisService::new(store, &self.config.optimizer)?;

        let room = service.analyze_room(snapshot.room_id).await?;
        self.print_room(&room, |team_id| snapshot.team_name(team_id).map(str::to_string))
    }

    async fn analyze_room(&self, room_id: RoomId) -> Result<()> {
        let store = self.connect().await?;
        let service = TeamAnalysisService::new(store, &self.config.optimizer)?;

        let room = service.analyze_room(room_id).await?;
        self.print_room(&room, |_| None)
    }

    async fn show_rating(&self, team_id: TeamId) -> Result<()> {
        let store = self.connect().await?;
        let record = store.rating(team_id).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&record)?);
            return Ok(());
        }
        match record {
            Some(record) => {
                println!("Team {} rating (calculated {})", team_id, record.calculated_at);
                println!("{}", "=".repeat(50));
                print_rating(&record.rating);
            }
            None => println!("Team {} has no rating yet", team_id),
        }
        Ok(())
    }

    async fn connect(&self) -> Result<Arc<dyn TeamStore>> {
        let store = PgTeamStore::connect(&self.config.database)
            .await
            .context("Failed to connect to the team database")?;
        Ok(Arc::new(store))
    }

    fn print_room(
        &self,
        room: &RoomAnalysis,
        team_name: impl Fn(TeamId) -> Option<String>,
    ) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(room)?);
            return Ok(());
        }

        println!("Room {} analysis", room.room_id);
        println!("{}", "=".repeat(50));
        for team in &room.teams {
            let name = team_name(team.team_id).unwrap_or_else(|| format!("Team {}", team.team_id));
            print_team(&name, team);
        }

        println!("Standings");
        println!("{}", "-".repeat(50));
        for (rank, (team_id, rating)) in room.standings.iter().enumerate() {
            let name = team_name(*team_id).unwrap_or_else(|| format!("Team {}", team_id));
            println!("{:>2}. {:<30} {:>6.2}", rank + 1, name, rating.overall_rating);
        }
        match room.winner {
            Some(team_id) => {
                let name = team_name(team_id).unwrap_or_else(|| format!("Team {}", team_id));
                println!("\nWinner: {}", name);
            }
            None => println!("\nNo team has a complete playing XI yet"),
        }
        Ok(())
    }
}

fn print_team(name: &str, team: &TeamAnalysis) {
    println!("{}", name);
    match &team.selection {
        LineupSelection::Selected(lineup) => {
            println!("  Playing XI (total {:.2}):", lineup.total_score);
            print_players(&lineup.players);
            println!("  Bench:");
            print_players(&team.bench);
            match &team.impact_player {
                Some(player) => println!("  Impact player: {} ({:.2})", player.name, player.overall_score),
                None => println!("  Impact player: none"),
            }
        }
        LineupSelection::InsufficientRoster { roster_size, required } => {
            println!("  Roster has {} of {} players needed", roster_size, required);
        }
        LineupSelection::NoValidCombination { roster_size } => {
            println!("  No valid XI among {} players", roster_size);
        }
    }
    if let Some(record) = &team.rating {
        print_rating(&record.rating);
    }
    println!();
}

fn print_players(players: &[Player]) {
    for player in players {
        println!(
            "    {:<4} {:<28} {:<14} {:>6.2}{}",
            player.role.code(),
            player.name,
            player.country,
            player.overall_score,
            if player.is_overseas { "  (overseas)" } else { "" }
        );
    }
}

fn print_rating(rating: &TeamRating) {
    println!("  Overall:       {:>6.2}", rating.overall_rating);
    println!("  Batting:       {:>6.2}", rating.batting_rating);
    println!("  Bowling:       {:>6.2}", rating.bowling_rating);
    println!("  Balance:       {:>6.2}", rating.balance_score);
    println!("  Bench depth:   {:>6.2}", rating.bench_depth);
    println!("  Role coverage: {:>6.2}", rating.role_coverage);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::parse_from(["team-analysis", "analyze", "--roster", "room.json", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Analyze { ref roster } if roster == Path::new("room.json")));

        let cli = Cli::parse_from(["team-analysis", "-c", "analysis.toml", "room", "--room", "3"]);
        assert_eq!(cli.config.as_deref(), Some(Path::new("analysis.toml")));
        assert!(matches!(cli.command, Commands::Room { room: 3 }));
    }
}
