// rust/engine/tests/policy_contracts.rs
#![forbid(unsafe_code)]

/**
 * Move-search and policy contract tests.
 *
 * Purpose:
 * - Enforce shared behavior contracts for the automated player:
 *   distinct reachable placements, plan/landing agreement, determinism,
 *   and input-state purity.
 *
 * Covered:
 * - `enumerate_moves` (dedup, reachability, candidate counts on an empty board)
 * - `evaluate_placement` terms on hand-built boards
 * - `HeuristicPolicy` / `best_plan` (hold branch must win strictly)
 * - `RandomPolicy` (seeded, never holds)
 * - `Bot` (one placement per decision)
 */
use std::collections::HashSet;

use blockfall_engine::policy::{
    HeuristicTerms, best_candidate, enumerate_moves, evaluate_placement, score_placement,
};
use blockfall_engine::{
    Bot, Color, Footprint, Game, GameSnapshot, Grid, HeuristicPolicy, HoldPolicy, Policy,
    RandomPolicy, TickOutcome, Variant, compute_score,
};

const GREY: Color = Color::rgb(0x808080);

fn spawned(seed: u64, variant: Variant) -> Game {
    let mut g = Game::new(seed);
    assert!(matches!(g.advance(), TickOutcome::Spawned { .. }));
    g.replace_active(variant).expect("empty board spawn");
    g
}

fn fixture_game(seed: u64) -> Game {
    let mut g = Game::new(seed);
    // Ragged stack with a covered gap.
    let mut cells = Vec::new();
    for x in 0..14 {
        let h = [3, 2, 4, 1, 0, 2, 5, 3, 1, 1, 2, 4, 0, 3][x as usize];
        for y in 0..h {
            cells.push((x, y));
        }
    }
    cells.retain(|&c| c != (2, 1));
    g.grid_mut().fill_settled(&cells, GREY);
    g.advance();
    g
}

fn snapshot(g: &Game) -> GameSnapshot {
    g.snapshot()
}

// -----------------------------------------------------------------------------
// enumerate_moves
// -----------------------------------------------------------------------------

#[test]
fn square_piece_yields_one_footprint_per_column_on_empty_board() {
    let g = spawned(1, Variant::O);
    let cands = enumerate_moves(g.grid(), g.active().expect("active"));

    assert_eq!(cands.len(), 13);
    assert!(cands.iter().all(|c| c.rotations == 0));
    let cols: Vec<i32> = cands.iter().map(|c| c.column).collect();
    assert_eq!(cols, (1..=13).collect::<Vec<_>>());
}

#[test]
fn asymmetric_piece_keeps_every_rotation_on_empty_board() {
    let g = spawned(1, Variant::T);
    let cands = enumerate_moves(g.grid(), g.active().expect("active"));

    // 13 + 12 + 13 + 12 columns for the four T orientations.
    assert_eq!(cands.len(), 50);
    for r in 0..4u8 {
        assert!(cands.iter().any(|c| c.rotations == r));
    }
}

#[test]
fn candidates_are_distinct_landed_and_placeable() {
    for v in Variant::all().iter().copied() {
        let mut g = fixture_game(9);
        if g.replace_active(v).is_none() {
            continue;
        }
        let grid = g.grid();
        let cands = enumerate_moves(grid, g.active().expect("active"));
        assert!(!cands.is_empty(), "{v:?}");

        let keys: HashSet<_> = cands.iter().map(|c| c.footprint.key()).collect();
        assert_eq!(keys.len(), cands.len(), "duplicate footprint for {v:?}");

        for c in &cands {
            assert!(c.footprint.fits(grid));
            assert!(!c.footprint.translated(0, -1).fits(grid));
        }
    }
}

// -----------------------------------------------------------------------------
// Heuristic terms
// -----------------------------------------------------------------------------

#[test]
fn flat_placement_against_the_wall_beats_a_standing_one() {
    let grid = Grid::new(14, 20);

    let standing = Footprint::new([(0, 3), (0, 2), (0, 1), (0, 0)]);
    let t = evaluate_placement(&grid, &standing, 1000);
    assert_eq!(
        t,
        HeuristicTerms {
            holes: 0,
            pillars: 0,
            height: 0,
            potential_score: 0,
            alone: true,
            topping_out: true,
        }
    );
    assert!((t.score(20) - 2.4).abs() < 1e-9);

    let flat = Footprint::new([(13, 0), (12, 0), (11, 0), (10, 0)]);
    let t = evaluate_placement(&grid, &flat, 1000);
    assert!(!t.alone);
    assert!(!t.topping_out);
    assert!((score_placement(&grid, &flat, 1000) - 3.4).abs() < 1e-9);
}

#[test]
fn holes_pillars_and_completed_rows_are_counted() {
    let mut grid = Grid::new(3, 8);
    let mut sides = Vec::new();
    for y in 0..8 {
        sides.push((0, y));
        sides.push((2, y));
    }
    grid.fill_settled(&sides, GREY);

    // Plug the top half of the middle well; the bottom four rows stay open.
    let plug = Footprint::new([(1, 7), (1, 6), (1, 5), (1, 4)]);
    let t = evaluate_placement(&grid, &plug, 1000);

    assert_eq!(t.holes, 1);
    assert_eq!(t.pillars, 1);
    assert_eq!(t.height, 4);
    assert_eq!(t.potential_score, compute_score(4, 1000));
    assert!(!t.alone);
    assert!(!t.topping_out);

    let expected = 8.0 / 30.0 + 4.0 + 0.5 + 0.5;
    assert!((t.score(8) - expected).abs() < 1e-9);
}

#[test]
fn topping_out_starts_two_rows_above_the_stack() {
    let mut grid = Grid::new(14, 20);
    // Left block three rows tall: stack height 3, top settled row 2.
    let block: Vec<(i32, i32)> = (0..4).flat_map(|x| (0..3).map(move |y| (x, y))).collect();
    grid.fill_settled(&block, GREY);
    assert_eq!(grid.skyline(), 3);

    let column_topped_at =
        |top: i32| Footprint::new([(8, top), (8, top - 1), (8, top - 2), (8, top - 3)]);

    for top in [3, 4] {
        let t = evaluate_placement(&grid, &column_topped_at(top), 1000);
        assert!(!t.topping_out, "top row {top}");
    }
    for top in [5, 9] {
        let t = evaluate_placement(&grid, &column_topped_at(top), 1000);
        assert!(t.topping_out, "top row {top}");
    }
}

#[test]
fn floating_footprint_counts_a_hole_per_unsupported_cell() {
    let grid = Grid::new(14, 20);
    let floating = Footprint::new([(0, 1), (1, 1), (2, 1), (3, 1)]);
    assert_eq!(evaluate_placement(&grid, &floating, 1000).holes, 4);
}

// -----------------------------------------------------------------------------
// Heuristic policy
// -----------------------------------------------------------------------------

#[test]
fn heuristic_lays_the_line_piece_flat_in_the_corner() {
    let g = spawned(3, Variant::I);
    let (best, score) =
        best_candidate(g.grid(), g.active().expect("active"), g.rate_ms(), score_placement)
            .expect("candidate");

    assert_eq!(
        best.footprint,
        Footprint::new([(10, 0), (11, 0), (12, 0), (13, 0)])
    );
    assert_eq!(best.rotations, 1);
    assert!((score - 3.4).abs() < 1e-9);
}

#[test]
fn hold_branch_is_taken_only_when_strictly_better() {
    for seed in 0..30u64 {
        let g = fixture_game(seed);
        if g.is_ended() {
            continue;
        }
        let plan = HeuristicPolicy::new().plan(&g).expect("plan");

        let stay = best_candidate(
            g.grid(),
            g.active().expect("active"),
            g.rate_ms(),
            score_placement,
        )
        .map(|(_, s)| s)
        .unwrap_or(f64::NEG_INFINITY);

        let mut swapped = g.clone();
        assert!(swapped.hold_with(HoldPolicy::Unlimited));
        let swap = swapped
            .active()
            .and_then(|p| best_candidate(swapped.grid(), p, swapped.rate_ms(), score_placement))
            .map(|(_, s)| s)
            .unwrap_or(f64::NEG_INFINITY);

        assert_eq!(plan.hold, swap > stay, "seed {seed}");
        assert_eq!(plan.score, stay.max(swap), "seed {seed}");
    }
}

#[test]
fn executed_plan_lands_exactly_on_planned_footprint() {
    for seed in 0..12u64 {
        let mut g = Game::new(seed);
        g.advance();
        let plan = HeuristicPolicy::new().plan(&g).expect("plan");

        if plan.hold {
            assert!(g.hold_with(HoldPolicy::Unlimited));
        }
        for _ in 0..plan.rotations {
            assert!(g.rotate_right());
        }
        loop {
            let x = g.active().expect("active").pivot().0;
            if x == plan.column {
                break;
            }
            assert!(if x > plan.column { g.move_left() } else { g.move_right() });
        }
        assert_eq!(g.shadow(), Some(plan.footprint), "seed {seed}");

        assert!(g.hard_drop());
        for &(x, y) in plan.footprint.cells() {
            assert!(g.grid().is_settled_at(x, y), "seed {seed}");
        }
    }
}

#[test]
fn planning_does_not_mutate_the_game() {
    let g = fixture_game(44);
    let before = snapshot(&g);

    let _ = HeuristicPolicy::new().plan(&g);
    let _ = RandomPolicy::new(1).plan(&g);

    assert_eq!(before, snapshot(&g));
}

#[test]
fn random_policy_is_seeded_and_never_holds() {
    let g = fixture_game(5);
    let legal: HashSet<Footprint> = enumerate_moves(g.grid(), g.active().expect("active"))
        .into_iter()
        .map(|c| c.footprint)
        .collect();

    let mut a = RandomPolicy::new(99);
    let mut b = RandomPolicy::new(99);
    for _ in 0..20 {
        let pa = a.plan(&g).expect("plan");
        let pb = b.plan(&g).expect("plan");
        assert_eq!(pa, pb);
        assert!(!pa.hold);
        assert!(legal.contains(&pa.footprint));
    }
}

#[test]
fn policies_decline_when_paused() {
    let mut g = fixture_game(5);
    g.pause();
    assert!(HeuristicPolicy::new().plan(&g).is_none());
    assert!(RandomPolicy::new(0).plan(&g).is_none());
    assert!(Bot::heuristic().choose_move(&mut g).is_none());
}

// -----------------------------------------------------------------------------
// Bot
// -----------------------------------------------------------------------------

#[test]
fn bot_places_one_piece_per_decision_and_clears_rows() {
    let mut g = Game::new(2024);
    g.advance();
    let mut bot = Bot::heuristic();

    let mut decisions = 0u64;
    for _ in 0..200 {
        if g.is_ended() {
            break;
        }
        assert!(bot.choose_move(&mut g).is_some());
        decisions += 1;
        assert_eq!(g.pieces_placed(), decisions);
    }
    assert!(g.rows_cleared() > 0);
}

#[test]
fn bot_games_are_deterministic_for_a_seed() {
    let play = |seed: u64| {
        let mut g = Game::new(seed);
        g.advance();
        let mut bot = Bot::heuristic();
        for _ in 0..40 {
            if bot.choose_move(&mut g).is_none() {
                break;
            }
        }
        snapshot(&g)
    };
    assert_eq!(play(8), play(8));
}
