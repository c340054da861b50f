// rust/engine/src/engine/constants.rs
#![forbid(unsafe_code)]

/// Default playfield width in cells.
pub const DEFAULT_WIDTH: usize = 14;
/// Default visible height; settled cells above this row end the game.
pub const DEFAULT_VISIBLE_HEIGHT: i32 = 20;

/// Gravity cadence at game start (ms per tick).
pub const INITIAL_RATE_MS: u64 = 1000;
/// Gravity never gets faster than this.
pub const MIN_RATE_MS: u64 = 200;

/// A grounded piece may still slide for this long after its last move attempt.
pub const LOCK_LENIENCY_MS: u64 = 300;
/// ...or until it has failed to descend on more than this many consecutive attempts.
pub const MAX_LOCK_WAITS: u32 = 5;
/// Upper bound on the lock-in delay handed to the host scheduler.
pub const LOCK_DELAY_CAP_MS: u64 = 400;

/// Delay between automated-player decisions.
pub const BOT_DELAY_MS: u64 = 10;

/// `compute_score` multiplier is `(SCORE_RATE_CEILING - rate) / 100`.
pub const SCORE_RATE_CEILING: u64 = 1100;

/// Rotation states tried by the move search (0..4 right turns).
pub const MAX_ROTS: usize = 4;

/// Cells per piece.
pub const PIECE_CELLS: usize = 4;
