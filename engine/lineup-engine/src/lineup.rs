//! Playing XI selection
//!
//! The selector picks the valid XI with the highest total `overall_score`.
//! Rosters up to `exhaustive_roster_limit` players are searched exhaustively:
//! every C(n, xi) index combination is enumerated in lexicographic order over
//! the roster, and the first combination reaching the maximum wins. Exhaustive
//! search is exponential in roster size, so larger rosters fall back to an exact
//! dynamic program over the constraint counts, which is polynomial in roster
//! size and returns the same optimum.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::rules::{Composition, LineupRules};
use crate::types::{Player, PlayerId, PlayerRole, RosterEntry};

/// Largest roster searched exhaustively by default (C(20, 11) = 167,960 combinations)
pub const DEFAULT_EXHAUSTIVE_ROSTER_LIMIT: usize = 20;

/// Search procedure that produced a lineup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Full enumeration of index combinations
    Exhaustive,
    /// Dynamic program over role and overseas counts
    BoundedDp,
}

/// A selected playing XI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lineup {
    /// Positions of the selected players in the input roster, ascending
    pub indices: Vec<usize>,
    /// Selected players in roster order
    pub players: Vec<Player>,
    /// Sum of the selected players' overall scores
    pub total_score: f64,
    pub strategy: SearchStrategy,
}

impl Lineup {
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }
}

/// Outcome of a lineup selection
///
/// Both failure variants are recoverable auction states, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LineupSelection {
    Selected(Lineup),
    /// Fewer players than the XI size; the auction is still in progress
    InsufficientRoster { roster_size: usize, required: usize },
    /// Enough players, but no subset satisfies the composition rules
    NoValidCombination { roster_size: usize },
}

impl LineupSelection {
    pub fn lineup(&self) -> Option<&Lineup> {
        match self {
            LineupSelection::Selected(lineup) => Some(lineup),
            _ => None,
        }
    }

    pub fn into_lineup(self) -> Option<Lineup> {
        match self {
            LineupSelection::Selected(lineup) => Some(lineup),
            _ => None,
        }
    }

    /// Selected players, or an empty slice when selection failed
    pub fn players(&self) -> &[Player] {
        self.lineup().map(|l| l.players.as_slice()).unwrap_or(&[])
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, LineupSelection::Selected(_))
    }
}

/// Selects the highest-scoring valid XI from a roster
#[derive(Debug, Clone)]
pub struct LineupSelector {
    rules: LineupRules,
    exhaustive_roster_limit: usize,
}

impl Default for LineupSelector {
    fn default() -> Self {
        Self {
            rules: LineupRules::default(),
            exhaustive_roster_limit: DEFAULT_EXHAUSTIVE_ROSTER_LIMIT,
        }
    }
}

impl LineupSelector {
    pub fn new(rules: LineupRules, exhaustive_roster_limit: usize) -> Result<Self> {
        rules.validate()?;
        Ok(Self { rules, exhaustive_roster_limit })
    }

    pub fn rules(&self) -> &LineupRules {
        &self.rules
    }

    /// Strategy that will be used for a roster of `roster_size` players
    pub fn strategy_for(&self, roster_size: usize) -> SearchStrategy {
        if roster_size <= self.exhaustive_roster_limit {
            SearchStrategy::Exhaustive
        } else {
            SearchStrategy::BoundedDp
        }
    }

    /// Select the playing XI from a team's roster entries
    pub fn select_lineup(&self, roster: &[RosterEntry]) -> Result<LineupSelection> {
        let players: Vec<&Player> = roster.iter().map(|e| &e.player).collect();
        self.select_from(&players)
    }

    /// Select the playing XI from bare players
    pub fn select_players(&self, players: &[Player]) -> Result<LineupSelection> {
        let players: Vec<&Player> = players.iter().collect();
        self.select_from(&players)
    }

    /// Select using a forced strategy, ignoring the roster size limit
    pub fn select_with_strategy(
        &self,
        players: &[Player],
        strategy: SearchStrategy,
    ) -> Result<LineupSelection> {
        let players: Vec<&Player> = players.iter().collect();
        self.run(&players, strategy)
    }

    fn select_from(&self, players: &[&Player]) -> Result<LineupSelection> {
        self.run(players, self.strategy_for(players.len()))
    }

    fn run(&self, players: &[&Player], strategy: SearchStrategy) -> Result<LineupSelection> {
        let roster_size = players.len();
        if roster_size < self.rules.xi_size {
            return Ok(LineupSelection::InsufficientRoster {
                roster_size,
                required: self.rules.xi_size,
            });
        }
        for player in players {
            player.check_scores()?;
        }

        let best = match strategy {
            SearchStrategy::Exhaustive => self.exhaustive(players),
            SearchStrategy::BoundedDp => self.bounded_dp(players),
        };

        Ok(match best {
            Some(indices) => {
                let selected: Vec<Player> = indices.iter().map(|&i| players[i].clone()).collect();
                let total_score = selected.iter().map(|p| p.overall_score).sum();
                LineupSelection::Selected(Lineup {
                    indices,
                    players: selected,
                    total_score,
                    strategy,
                })
            }
            None => LineupSelection::NoValidCombination { roster_size },
        })
    }

    fn exhaustive(&self, players: &[&Player]) -> Option<Vec<usize>> {
        let mut best: Option<(Vec<usize>, f64)> = None;
        let mut examined: u64 = 0;
        let mut valid: u64 = 0;

        for combo in (0..players.len()).combinations(self.rules.xi_size) {
            examined += 1;
            let composition = Composition::of(combo.iter().map(|&i| players[i]));
            if !self.rules.is_valid(&composition) {
                continue;
            }
            valid += 1;
            let score: f64 = combo.iter().map(|&i| players[i].overall_score).sum();
            match &best {
                Some((_, best_score)) if score <= *best_score => {}
                _ => best = Some((combo, score)),
            }
        }

        debug!(
            roster_size = players.len(),
            examined,
            valid,
            best_score = best.as_ref().map(|(_, s)| *s),
            "Exhaustive lineup search finished"
        );
        best.map(|(indices, _)| indices)
    }

    fn bounded_dp(&self, players: &[&Player]) -> Option<Vec<usize>> {
        let space = StateSpace::new(&self.rules);
        let states = space.len();
        let n = players.len();

        // value[i * states + s]: best score reachable from player i onwards in state s
        let mut value = vec![f64::NEG_INFINITY; (n + 1) * states];
        for s in 0..states {
            if space.is_complete(space.decode(s), &self.rules) {
                value[n * states + s] = 0.0;
            }
        }
        for i in (0..n).rev() {
            for s in 0..states {
                let skip = value[(i + 1) * states + s];
                let take = space
                    .advance(space.decode(s), players[i])
                    .map(|next| players[i].overall_score + value[(i + 1) * states + space.encode(next)])
                    .unwrap_or(f64::NEG_INFINITY);
                value[i * states + s] = if take > skip { take } else { skip };
            }
        }

        let mut state = SearchState::default();
        if value[space.encode(state)] == f64::NEG_INFINITY {
            debug!(roster_size = n, states, "Bounded DP found no valid lineup");
            return None;
        }

        // Include a player whenever doing so stays optimal: this yields the
        // lexicographically smallest optimal index set.
        let mut indices = Vec::with_capacity(self.rules.xi_size);
        for (i, player) in players.iter().enumerate() {
            let here = value[i * states + space.encode(state)];
            if let Some(next) = space.advance(state, player) {
                let take = player.overall_score + value[(i + 1) * states + space.encode(next)];
                if take > f64::NEG_INFINITY && take == here {
                    indices.push(i);
                    state = next;
                }
            }
        }

        debug!(roster_size = n, states, best_score = value[0], "Bounded DP lineup search finished");
        Some(indices)
    }
}

/// Counts tracked while building a lineup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SearchState {
    picked: usize,
    keepers: usize,
    /// Capped at the batter minimum
    batters: usize,
    /// Capped at the bowler minimum
    bowlers: usize,
    all_rounders: usize,
    overseas: usize,
}

/// Mixed-radix encoding of every reachable [`SearchState`]
#[derive(Debug, Clone, Copy)]
struct StateSpace {
    picked: usize,
    keepers: usize,
    batters: usize,
    bowlers: usize,
    all_rounders: usize,
    overseas: usize,
}

impl StateSpace {
    fn new(rules: &LineupRules) -> Self {
        let xi = rules.xi_size;
        Self {
            picked: xi,
            keepers: rules.wicket_keepers.min(xi),
            batters: rules.min_batters.min(xi),
            bowlers: rules.min_bowlers.min(xi),
            all_rounders: rules.max_all_rounders.min(xi),
            overseas: rules.max_overseas.min(xi),
        }
    }

    fn radices(&self) -> [usize; 6] {
        [
            self.picked + 1,
            self.keepers + 1,
            self.batters + 1,
            self.bowlers + 1,
            self.all_rounders + 1,
            self.overseas + 1,
        ]
    }

    fn len(&self) -> usize {
        self.radices().iter().product()
    }

    fn encode(&self, s: SearchState) -> usize {
        let digits = [s.picked, s.keepers, s.batters, s.bowlers, s.all_rounders, s.overseas];
        digits.iter().zip(self.radices()).fold(0, |acc, (&d, radix)| acc * radix + d)
    }

    fn decode(&self, mut idx: usize) -> SearchState {
        let radices = self.radices();
        let mut digits = [0usize; 6];
        for k in (0..6).rev() {
            digits[k] = idx % radices[k];
            idx /= radices[k];
        }
        SearchState {
            picked: digits[0],
            keepers: digits[1],
            batters: digits[2],
            bowlers: digits[3],
            all_rounders: digits[4],
            overseas: digits[5],
        }
    }

    /// State after picking `player`, or `None` if picking breaks an upper bound
    fn advance(&self, s: SearchState, player: &Player) -> Option<SearchState> {
        if s.picked == self.picked {
            return None;
        }
        let mut next = SearchState { picked: s.picked + 1, ..s };
        match player.role {
            PlayerRole::WicketKeeper => {
                if s.keepers == self.keepers {
                    return None;
                }
                next.keepers += 1;
            }
            PlayerRole::Batter => next.batters = (s.batters + 1).min(self.batters),
            PlayerRole::Bowler => next.bowlers = (s.bowlers + 1).min(self.bowlers),
            PlayerRole::AllRounder => {
                if s.all_rounders == self.all_rounders {
                    return None;
                }
                next.all_rounders += 1;
            }
        }
        if player.is_overseas {
            if s.overseas == self.overseas {
                return None;
            }
            next.overseas += 1;
        }
        Some(next)
    }

    fn is_complete(&self, s: SearchState, rules: &LineupRules) -> bool {
        s.picked == rules.xi_size
            && s.keepers == rules.wicket_keepers
            && s.batters >= rules.min_batters
            && s.bowlers >= rules.min_bowlers
            && s.all_rounders >= rules.min_all_rounders
    }
}

/// Set-replace the playing XI flags on a roster snapshot
///
/// Listed players are flagged and every other entry is cleared. An impact flag
/// on a player moving into the XI is dropped, since the impact player must come
/// from the bench.
pub fn apply_lineup(roster: &mut [RosterEntry], player_ids: &[PlayerId]) {
    for entry in roster.iter_mut() {
        entry.in_playing_xi = player_ids.contains(&entry.player.id);
        entry.is_impact_player &= !entry.in_playing_xi;
    }
}
