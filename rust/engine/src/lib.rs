// rust/engine/src/lib.rs
#![forbid(unsafe_code)]

pub mod engine;
pub mod policy;
pub mod session;

// Flat re-exports for hosts (CLI, renderers, tests):
pub use engine::{
    Cell, Color, Command, Footprint, Game, GameConfig, GameSnapshot, Grid, HoldPolicy, Piece,
    PieceId, TickOutcome, Variant, compute_score,
};
pub use policy::{Bot, HeuristicPolicy, MovePlan, Policy, RandomPolicy};
pub use session::{Session, SessionConfig, SessionEvent, Timer};
