//! Room standings from computed team ratings

use crate::types::{TeamId, TeamRating};

/// Team with the highest overall rating; the first one wins a tie
pub fn determine_winner(ratings: &[(TeamId, TeamRating)]) -> Option<TeamId> {
    let mut winner: Option<(TeamId, f64)> = None;
    for &(team_id, rating) in ratings {
        match winner {
            Some((_, best)) if rating.overall_rating <= best => {}
            _ => winner = Some((team_id, rating.overall_rating)),
        }
    }
    winner.map(|(team_id, _)| team_id)
}

/// Teams ordered by overall rating, best first; ties keep input order
pub fn rank_teams(ratings: &[(TeamId, TeamRating)]) -> Vec<(TeamId, TeamRating)> {
    let mut ranked = ratings.to_vec();
    ranked.sort_by(|a, b| b.1.overall_rating.total_cmp(&a.1.overall_rating));
    ranked
}
