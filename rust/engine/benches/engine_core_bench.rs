// rust/engine/benches/engine_core_bench.rs
#![forbid(unsafe_code)]

/**
 * Core engine micro-benchmarks.
 *
 * Focus:
 * - Gravity kernel (`advance`) and hard drops
 * - Placement enumeration on a mid-game board
 * - Policy decision latency (heuristic with hold look-ahead, random baseline)
 */
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use blockfall_engine::policy::enumerate_moves;
use blockfall_engine::{Bot, Game, HeuristicPolicy, Policy, RandomPolicy};

fn build_nontrivial_game(seed: u64) -> Game {
    let mut g = Game::new(seed);
    g.advance();
    let mut bot = Bot::heuristic();
    for _ in 0..32 {
        if bot.choose_move(&mut g).is_none() {
            break;
        }
    }
    g
}

fn bench_gravity_and_drop(c: &mut Criterion) {
    c.bench_function("engine.advance.fall_to_lock", |b| {
        b.iter_batched(
            || Game::new(20260228),
            |mut g| {
                for _ in 0..64 {
                    black_box(g.advance());
                }
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("engine.hard_drop.256", |b| {
        b.iter_batched(
            || {
                let mut g = Game::new(20260228);
                g.advance();
                g
            },
            |mut g| {
                for i in 0usize..256 {
                    if g.is_ended() {
                        break;
                    }
                    if i % 2 == 0 {
                        g.move_left();
                    } else {
                        g.move_right();
                    }
                    black_box(g.hard_drop());
                }
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_enumerate_moves(c: &mut Criterion) {
    let g = build_nontrivial_game(777);
    c.bench_function("search.enumerate_moves", |b| {
        b.iter(|| {
            if let Some(p) = g.active() {
                black_box(enumerate_moves(g.grid(), p));
            }
        });
    });
}

fn bench_policy_plan(c: &mut Criterion) {
    c.bench_function("policy.heuristic.plan", |b| {
        b.iter_batched(
            || (build_nontrivial_game(1234), HeuristicPolicy::new()),
            |(g, mut p)| {
                black_box(p.plan(&g));
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("policy.random.plan", |b| {
        b.iter_batched(
            || (build_nontrivial_game(5678), RandomPolicy::new(5678)),
            |(g, mut p)| {
                black_box(p.plan(&g));
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    engine_core_benches,
    bench_gravity_and_drop,
    bench_enumerate_moves,
    bench_policy_plan
);
criterion_main!(engine_core_benches);
