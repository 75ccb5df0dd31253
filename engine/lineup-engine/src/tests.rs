//! Property tests across selection, bench analysis and rating

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::{
    apply_impact_player, apply_lineup, bench_of, partition, select_impact_player, LineupRules,
    LineupSelection, LineupSelector, Player, PlayerRole, RatingEngine, RosterEntry,
    SearchStrategy,
};

fn role_from(code: u8) -> PlayerRole {
    match code {
        0 => PlayerRole::WicketKeeper,
        1..=3 => PlayerRole::Batter,
        4..=6 => PlayerRole::Bowler,
        _ => PlayerRole::AllRounder,
    }
}

fn build_roster(specs: &[(u8, u32, bool)]) -> Vec<RosterEntry> {
    specs
        .iter()
        .enumerate()
        .map(|(i, &(role, score, overseas))| {
            let player = Player {
                id: i as i64 + 100,
                name: format!("Prop {i}"),
                role: role_from(role),
                country: if overseas { "New Zealand".into() } else { "India".into() },
                base_price: Decimal::new(50, 2),
                batting_score: score as f64,
                bowling_score: (100 - score) as f64,
                overall_score: score as f64,
                is_overseas: overseas,
            };
            RosterEntry::new(9, player, Decimal::ONE)
        })
        .collect()
}

/// Brute-force oracle: best total and the lexicographically first index set reaching it
fn oracle(roster: &[RosterEntry], rules: &LineupRules) -> Option<(f64, Vec<usize>)> {
    let n = roster.len();
    let mut best: Option<(f64, Vec<usize>)> = None;
    for mask in 0u32..(1 << n) {
        if mask.count_ones() as usize != rules.xi_size {
            continue;
        }
        let indices: Vec<usize> = (0..n).filter(|i| mask & (1 << i) != 0).collect();
        if !rules.is_valid_lineup(indices.iter().map(|&i| &roster[i].player)) {
            continue;
        }
        let total: f64 = indices.iter().map(|&i| roster[i].player.overall_score).sum();
        best = match best {
            Some((b, bi)) if b > total || (b == total && bi < indices) => Some((b, bi)),
            _ => Some((total, indices)),
        };
    }
    best
}

fn roster_specs() -> impl Strategy<Value = Vec<(u8, u32, bool)>> {
    prop::collection::vec((0u8..10, 0u32..100, prop::bool::weighted(0.3)), 12..=14)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_selection_matches_brute_force(specs in roster_specs()) {
        let roster = build_roster(&specs);
        let selector = LineupSelector::default();
        let players: Vec<Player> = roster.iter().map(|e| e.player.clone()).collect();
        let expected = oracle(&roster, selector.rules());

        for strategy in [SearchStrategy::Exhaustive, SearchStrategy::BoundedDp] {
            let selection = selector.select_with_strategy(&players, strategy).unwrap();
            match (&expected, &selection) {
                (Some((total, indices)), LineupSelection::Selected(lineup)) => {
                    prop_assert_eq!(lineup.total_score, *total);
                    prop_assert_eq!(&lineup.indices, indices);
                }
                (None, LineupSelection::NoValidCombination { roster_size }) => {
                    prop_assert_eq!(*roster_size, roster.len());
                }
                (e, s) => prop_assert!(false, "oracle {:?} vs selection {:?}", e, s),
            }
        }
    }

    #[test]
    fn prop_selected_lineup_has_valid_composition(specs in roster_specs()) {
        let roster = build_roster(&specs);
        let selection = LineupSelector::default().select_lineup(&roster).unwrap();
        if let Some(lineup) = selection.lineup() {
            let count = |role| lineup.players.iter().filter(|p| p.role == role).count();
            prop_assert_eq!(lineup.players.len(), 11);
            prop_assert_eq!(count(PlayerRole::WicketKeeper), 1);
            prop_assert!(count(PlayerRole::Batter) >= 3);
            prop_assert!(count(PlayerRole::Bowler) >= 2);
            prop_assert!((1..=3).contains(&count(PlayerRole::AllRounder)));
            prop_assert!(lineup.players.iter().filter(|p| p.is_overseas).count() <= 4);
        }
    }

    #[test]
    fn prop_bench_partitions_roster_and_impact_is_bench_max(specs in roster_specs()) {
        let mut roster = build_roster(&specs);
        let selection = LineupSelector::default().select_lineup(&roster).unwrap();
        let Some(lineup) = selection.into_lineup() else {
            return Ok(());
        };
        apply_lineup(&mut roster, &lineup.player_ids());

        let bench = bench_of(&roster);
        prop_assert_eq!(bench.len(), roster.len() - 11);
        for entry in &bench {
            prop_assert!(!lineup.contains(entry.player.id));
        }
        let (xi, bench_players) = partition(&roster);
        prop_assert_eq!(xi.len() + bench_players.len(), roster.len());

        let pick = select_impact_player(&bench).map(|p| (p.player.id, p.player.overall_score));
        let (impact_id, impact_score) = pick.expect("bench is never empty for n >= 12");
        let bench_max = bench.iter().map(|e| e.player.overall_score).fold(f64::MIN, f64::max);
        prop_assert_eq!(impact_score, bench_max);

        apply_impact_player(&mut roster, Some(impact_id));
        let flagged: Vec<&RosterEntry> = roster.iter().filter(|e| e.is_impact_player).collect();
        prop_assert_eq!(flagged.len(), 1);
        prop_assert!(!flagged[0].in_playing_xi);
    }

    #[test]
    fn prop_rating_is_bounded_and_follows_formula(
        lineup in prop::collection::vec((0u8..10, -50.0f64..200.0, -50.0f64..200.0, -50.0f64..200.0), 1..=11),
        bench in prop::collection::vec(-50.0f64..200.0, 0..=6),
    ) {
        let lineup: Vec<Player> = lineup
            .into_iter()
            .enumerate()
            .map(|(i, (role, bat, bowl, overall))| Player {
                id: i as i64,
                name: format!("L{i}"),
                role: role_from(role),
                country: "India".into(),
                base_price: Decimal::ONE,
                batting_score: bat,
                bowling_score: bowl,
                overall_score: overall,
                is_overseas: false,
            })
            .collect();
        let bench: Vec<Player> = bench
            .into_iter()
            .enumerate()
            .map(|(i, overall)| Player { id: 100 + i as i64, overall_score: overall, ..lineup[0].clone() })
            .collect();

        let rating = RatingEngine::default().calculate_team_rating(&lineup, &bench).unwrap();
        prop_assert!((0.0..=100.0).contains(&rating.overall_rating));

        let avg_xi = lineup.iter().map(|p| p.overall_score).sum::<f64>() / lineup.len() as f64;
        let expected = (0.6 * avg_xi + 0.3 * rating.balance_score + 0.1 * rating.bench_depth)
            .clamp(0.0, 100.0);
        prop_assert!((rating.overall_rating - expected).abs() < 1e-6);
        prop_assert!((0.0..=100.0).contains(&rating.role_coverage));
    }
}
