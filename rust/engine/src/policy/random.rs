// rust/engine/src/policy/random.rs
#![forbid(unsafe_code)]

use rand::prelude::*;

use crate::engine::Game;

use super::base::Policy;
use super::search::{MovePlan, enumerate_moves};

/// Baseline: uniform over the active piece's reachable placements, never holds.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn plan(&mut self, g: &Game) -> Option<MovePlan> {
        if g.is_paused() || g.is_ended() {
            return None;
        }
        let piece = g.active()?;
        let cands = enumerate_moves(g.grid(), piece);
        let &c = cands.choose(&mut self.rng)?;
        Some(MovePlan::from_candidate(c, false, 0.0))
    }
}
