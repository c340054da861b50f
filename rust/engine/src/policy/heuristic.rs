// rust/engine/src/policy/heuristic.rs
#![forbid(unsafe_code)]

use crate::engine::{Footprint, Game, Grid, compute_score};
use crate::policy::base::Policy;
use crate::policy::search::{MovePlan, best_plan};

/// Board-quality signals for one hypothetical placement.
///
/// All terms are measured on the settled stack with the footprint added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeuristicTerms {
    /// Footprint cells (above row 0) with nothing directly underneath.
    pub holes: u32,
    /// Rows inside deep (>= 4) flanked vertical gaps, counted per row past the third.
    pub pillars: u32,
    /// Lowest row the footprint touches.
    pub height: i32,
    /// Score the rows this placement completes would be worth.
    pub potential_score: u64,
    /// Topmost footprint cell has an empty neighbor at its own row.
    pub alone: bool,
    /// Topmost footprint cell sits more than one row above the settled skyline.
    pub topping_out: bool,
}

impl HeuristicTerms {
    /// Composite desirability; higher is better.
    pub fn score(&self, visible_height: i32) -> f64 {
        let low = f64::from(visible_height + 4 - self.height)
            / (10.0 * f64::from(self.pillars + self.holes + 1));
        let lines = (self.potential_score as f64).max(0.0).sqrt() / 10.0;
        let together = if self.alone { 0.0 } else { 0.5 };
        let flat = if self.topping_out { 0.0 } else { 0.5 };
        low + lines + together + flat
    }
}

pub fn evaluate_placement(grid: &Grid, fp: &Footprint, rate_ms: u64) -> HeuristicTerms {
    let w = grid.width();
    let vh = grid.visible_height();
    let filled = |x: i32, y: i32| grid.is_settled_at(x, y) || fp.contains(x, y);

    let holes = fp
        .cells()
        .iter()
        .filter(|&&(x, y)| y > 0 && !filled(x, y - 1))
        .count() as u32;

    let mut pillars = 0u32;
    for x in 0..w {
        let mut run = 0u32;
        for y in 0..vh {
            if filled(x, y) {
                run = 0;
                continue;
            }
            let left = x == 0 || filled(x - 1, y);
            let right = x + 1 >= w || filled(x + 1, y);
            if left && right {
                run += 1;
            }
            if run > 3 {
                pillars += 1;
            }
        }
    }

    let completed = (0..vh)
        .filter(|&y| {
            let from_fp = fp.cells().iter().filter(|&&(_, cy)| cy == y).count();
            grid.row_count(y) + from_fp == w as usize
        })
        .count() as u32;

    let (tx, ty) = fp.top_cell();
    // Walls count as filled.
    let open = |x: i32| x >= 0 && x < w && !filled(x, ty);

    HeuristicTerms {
        holes,
        pillars,
        height: fp.min_y(),
        potential_score: compute_score(completed, rate_ms),
        alone: open(tx - 1) || open(tx + 1),
        topping_out: ty > grid.skyline() + 1,
    }
}

#[inline]
pub fn score_placement(grid: &Grid, fp: &Footprint, rate_ms: u64) -> f64 {
    evaluate_placement(grid, fp, rate_ms).score(grid.visible_height())
}

/// The hand-tuned automated player: best heuristic placement for the active
/// piece, or for the piece a hold would bring in when that scores strictly higher.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for HeuristicPolicy {
    fn plan(&mut self, g: &Game) -> Option<MovePlan> {
        best_plan(g, score_placement)
    }
}
