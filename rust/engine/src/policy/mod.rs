// rust/engine/src/policy/mod.rs
#![forbid(unsafe_code)]

mod base;
mod heuristic;
mod random;
mod search;

/**
 * Curated policy public API.
 *
 * Internal implementation modules remain private; only stable policy entrypoints are re-exported.
 */
pub use base::Policy;
pub use heuristic::{HeuristicPolicy, HeuristicTerms, evaluate_placement, score_placement};
pub use random::RandomPolicy;
pub use search::{
    Bot, Candidate, MovePlan, best_candidate, best_plan, enumerate_moves, execute_plan,
};
