//! Benchmark for heuristic move choice
//!
//! Measures `choose_best_move_as` on an opening position for each strategy and
//! player count.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tessera_ai::{choose_best_move_as, enumerate_moves};
use tessera_engine::{create_initial_game_state, ALL_STRATEGIES};

fn bench_choose_best_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("choose_best_move");

    for num_players in [2, 4] {
        let mut rng = StdRng::seed_from_u64(42);
        let state = create_initial_game_state("local", num_players, &mut rng);
        let player = state.current_player();

        for strategy in ALL_STRATEGIES {
            group.bench_with_input(
                BenchmarkId::new(strategy.as_str(), num_players),
                &state,
                |b, state| {
                    b.iter(|| {
                        black_box(choose_best_move_as(
                            Some(strategy),
                            player,
                            black_box(state),
                            &mut rng,
                        ))
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_enumerate_moves(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let state = create_initial_game_state("local", 4, &mut rng);

    c.bench_function("enumerate_moves_4p", |b| {
        b.iter(|| black_box(enumerate_moves(state.current_player(), black_box(&state))))
    });
}

criterion_group!(benches, bench_choose_best_move, bench_enumerate_moves);
criterion_main!(benches);
