//! Bench analysis: impact player selection

use crate::types::{Player, PlayerId, RosterEntry};

/// The chosen impact player and its position in the bench slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactPick<'a> {
    pub bench_index: usize,
    pub player: &'a Player,
}

/// Pick the highest-scoring bench player; the first one wins a tie.
///
/// Callers must pass the bench in a stable order (roster creation order) for
/// the tie-break to be reproducible.
pub fn select_impact_player(bench: &[RosterEntry]) -> Option<ImpactPick<'_>> {
    let mut best: Option<ImpactPick<'_>> = None;
    for (bench_index, entry) in bench.iter().enumerate() {
        match best {
            Some(current) if entry.player.overall_score <= current.player.overall_score => {}
            _ => best = Some(ImpactPick { bench_index, player: &entry.player }),
        }
    }
    best
}

/// Entries not in the playing XI, in roster order
pub fn bench_of(roster: &[RosterEntry]) -> Vec<RosterEntry> {
    roster.iter().filter(|e| !e.in_playing_xi).cloned().collect()
}

/// Split a roster into (playing XI, bench) players by the `in_playing_xi` flag
pub fn partition(roster: &[RosterEntry]) -> (Vec<Player>, Vec<Player>) {
    let (xi, bench): (Vec<&RosterEntry>, Vec<&RosterEntry>) =
        roster.iter().partition(|e| e.in_playing_xi);
    (
        xi.into_iter().map(|e| e.player.clone()).collect(),
        bench.into_iter().map(|e| e.player.clone()).collect(),
    )
}

/// Clear the impact flag on every entry, then set it on `winner` only
pub fn apply_impact_player(roster: &mut [RosterEntry], winner: Option<PlayerId>) {
    for entry in roster.iter_mut() {
        entry.is_impact_player = Some(entry.player.id) == winner;
    }
}
