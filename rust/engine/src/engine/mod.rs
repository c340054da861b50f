// rust/engine/src/engine/mod.rs
#![forbid(unsafe_code)]

mod bag;
mod cell;
mod config;
mod constants;
mod game;
mod grid;
mod piece;
mod pieces;

/**
 * Curated engine public API.
 *
 * Internal implementation modules remain private; only stable items are re-exported here.
 */
pub use bag::Bag;
pub use cell::{Cell, Color, PieceId};
pub use config::{ConfigError, GameConfig};
pub use constants::{
    BOT_DELAY_MS, DEFAULT_VISIBLE_HEIGHT, DEFAULT_WIDTH, INITIAL_RATE_MS, LOCK_DELAY_CAP_MS,
    LOCK_LENIENCY_MS, MAX_LOCK_WAITS, MAX_ROTS, MIN_RATE_MS, PIECE_CELLS, SCORE_RATE_CEILING,
};
pub use game::{CellView, Command, Game, GameSnapshot, HoldPolicy, PieceView, TickOutcome};
pub use grid::{Grid, compute_score};
pub use piece::{Footprint, Piece, Shift, Turn};
pub use pieces::{RotationCenter, Variant};
