// rust/engine/src/engine/bag.rs
#![forbid(unsafe_code)]

use rand::prelude::*;

use crate::engine::pieces::Variant;

/// 7-bag randomizer: every variant exactly once per shuffled cycle.
#[derive(Clone, Debug)]
pub struct Bag {
    // RNG lives here (spawn stream responsibility)
    rng: StdRng,
    pending: Vec<Variant>,
}

impl Bag {
    pub fn new(seed: u64) -> Self {
        let mut bag = Self {
            rng: StdRng::seed_from_u64(seed),
            pending: Vec::with_capacity(Variant::all().len()),
        };
        bag.refill();
        bag
    }

    /// Throws away what is left of the current cycle and shuffles a new one.
    pub fn refill(&mut self) {
        self.pending.clear();
        self.pending.extend_from_slice(Variant::all());
        self.pending.shuffle(&mut self.rng);
    }

    /// Variants left in the current cycle, in draw order.
    pub fn remaining(&self) -> &[Variant] {
        &self.pending
    }

    pub fn draw(&mut self) -> Variant {
        if self.pending.is_empty() {
            self.refill();
        }
        // Draw from the front so `remaining()` reads in order.
        self.pending.remove(0)
    }
}
