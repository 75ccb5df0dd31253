use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lineup_engine::{LineupSelector, Player, PlayerRole, SearchStrategy};
use rust_decimal::Decimal;

fn create_roster(size: usize) -> Vec<Player> {
    (0..size)
        .map(|i| {
            let role = match i % 6 {
                0 => PlayerRole::WicketKeeper,
                1 | 2 => PlayerRole::Batter,
                3 | 4 => PlayerRole::Bowler,
                _ => PlayerRole::AllRounder,
            };
            Player::with_composite_score(
                i as i64,
                format!("Bench Player {i}"),
                role,
                if i % 4 == 0 { "Australia" } else { "India" },
                Decimal::new(200, 2),
                30.0 + (i * 7 % 50) as f64,
                25.0 + (i * 11 % 60) as f64,
                i % 4 == 0,
            )
        })
        .collect()
}

fn bench_exhaustive_roster_18(c: &mut Criterion) {
    let selector = LineupSelector::default();
    let roster = create_roster(18);

    c.bench_function("exhaustive_roster_18", |b| {
        b.iter(|| {
            let selection =
                selector.select_with_strategy(black_box(&roster), SearchStrategy::Exhaustive);
            black_box(selection).unwrap();
        })
    });
}

fn bench_dp_roster_18(c: &mut Criterion) {
    let selector = LineupSelector::default();
    let roster = create_roster(18);

    c.bench_function("bounded_dp_roster_18", |b| {
        b.iter(|| {
            let selection =
                selector.select_with_strategy(black_box(&roster), SearchStrategy::BoundedDp);
            black_box(selection).unwrap();
        })
    });
}

fn bench_dp_roster_40(c: &mut Criterion) {
    let selector = LineupSelector::default();
    let roster = create_roster(40);

    c.bench_function("bounded_dp_roster_40", |b| {
        b.iter(|| {
            let selection = selector.select_players(black_box(&roster));
            black_box(selection).unwrap();
        })
    });
}

criterion_group!(benches, bench_exhaustive_roster_18, bench_dp_roster_18, bench_dp_roster_40);
criterion_main!(benches);
