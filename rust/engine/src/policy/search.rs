// rust/engine/src/policy/search.rs
#![forbid(unsafe_code)]

use rustc_hash::FxHashSet;

use crate::engine::{Footprint, Game, Grid, HoldPolicy, MAX_ROTS, Piece, Turn};
use crate::policy::base::Policy;
use crate::policy::heuristic::HeuristicPolicy;

/// One reachable placement: `rotations` right turns, slide the pivot to `column`, drop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub rotations: u8,
    pub column: i32,
    pub footprint: Footprint,
}

/// A chosen candidate plus whether to hold first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovePlan {
    pub hold: bool,
    pub rotations: u8,
    pub column: i32,
    pub footprint: Footprint,
    pub score: f64,
}

impl MovePlan {
    pub fn from_candidate(c: Candidate, hold: bool, score: f64) -> Self {
        Self {
            hold,
            rotations: c.rotations,
            column: c.column,
            footprint: c.footprint,
            score,
        }
    }
}

/// Every distinct landing footprint of `piece` on `grid`.
///
/// Rotation states are tried on a disposable copy (0..4 right turns; a blocked
/// turn ends the sweep since later states are unreachable too). For each state,
/// every column whose shadow exists and that the piece can slide to at its current
/// height becomes a candidate. Footprints already seen are dropped, so symmetric
/// rotations collapse. Order: rotation-major, then column ascending.
pub fn enumerate_moves(grid: &Grid, piece: &Piece) -> Vec<Candidate> {
    let mut seen: FxHashSet<Footprint> = FxHashSet::default();
    let mut out = Vec::new();
    let mut probe = piece.clone();

    for rotations in 0..MAX_ROTS as u8 {
        if rotations > 0 && !probe.rotate(grid, Turn::Right) {
            break;
        }
        for column in 0..grid.width() {
            let Some(footprint) = probe.shadow(grid, column) else {
                continue;
            };
            if !probe.path_clear(grid, column) {
                continue;
            }
            if seen.insert(footprint) {
                out.push(Candidate {
                    rotations,
                    column,
                    footprint,
                });
            }
        }
    }

    out
}

/// Highest-scoring candidate; the first one in enumeration order wins ties.
pub fn best_candidate<F>(grid: &Grid, piece: &Piece, rate_ms: u64, score: F) -> Option<(Candidate, f64)>
where
    F: Fn(&Grid, &Footprint, u64) -> f64,
{
    let mut best: Option<(Candidate, f64)> = None;
    for c in enumerate_moves(grid, piece) {
        let s = score(grid, &c.footprint, rate_ms);
        match best {
            None => best = Some((c, s)),
            Some((_bc, bs)) if s > bs => best = Some((c, s)),
            _ => {}
        }
    }
    best
}

/// Compares the best placement of the active piece with the best placement of the
/// piece a (bot) hold would bring in. The hold branch must score strictly higher.
pub fn best_plan<F>(g: &Game, score: F) -> Option<MovePlan>
where
    F: Fn(&Grid, &Footprint, u64) -> f64,
{
    if g.is_paused() || g.is_ended() {
        return None;
    }

    let stay = g
        .active()
        .and_then(|p| best_candidate(g.grid(), p, g.rate_ms(), &score));

    let mut swapped = g.clone();
    let swap = if swapped.hold_with(HoldPolicy::Unlimited) && !swapped.is_ended() {
        swapped
            .active()
            .and_then(|p| best_candidate(swapped.grid(), p, swapped.rate_ms(), &score))
    } else {
        None
    };

    match (stay, swap) {
        (Some((a, sa)), Some((b, sb))) => Some(if sb > sa {
            MovePlan::from_candidate(b, true, sb)
        } else {
            MovePlan::from_candidate(a, false, sa)
        }),
        (Some((a, sa)), None) => Some(MovePlan::from_candidate(a, false, sa)),
        (None, Some((b, sb))) => Some(MovePlan::from_candidate(b, true, sb)),
        (None, None) => None,
    }
}

/// Issues the plan through the ordinary command surface: optional hold, right
/// turns, single-column slides, hard drop. Returns false (and stops) on the first
/// rejected command.
pub fn execute_plan(g: &mut Game, plan: &MovePlan) -> bool {
    if plan.hold && !g.hold_with(HoldPolicy::Unlimited) {
        return false;
    }
    for _ in 0..plan.rotations {
        if !g.rotate_right() {
            return false;
        }
    }
    loop {
        let Some(piece) = g.active() else {
            return false;
        };
        let x = piece.pivot().0;
        if x == plan.column {
            break;
        }
        let moved = if x > plan.column {
            g.move_left()
        } else {
            g.move_right()
        };
        if !moved {
            return false;
        }
    }
    debug_assert_eq!(g.shadow(), Some(plan.footprint));
    g.hard_drop()
}

/// Automated-player attachment: plans with a `Policy` and executes the plan.
pub struct Bot {
    policy: Box<dyn Policy>,
}

impl Bot {
    pub fn new(policy: Box<dyn Policy>) -> Self {
        Self { policy }
    }

    pub fn heuristic() -> Self {
        Self::new(Box::new(HeuristicPolicy::new()))
    }

    /// One decide-and-execute cycle. `None` if there was nothing to do or the
    /// plan could not be carried out.
    pub fn choose_move(&mut self, g: &mut Game) -> Option<MovePlan> {
        let plan = self.policy.plan(g)?;
        execute_plan(g, &plan).then_some(plan)
    }
}
