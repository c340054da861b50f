// rust/engine/src/engine/config.rs
#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::constants::{
    DEFAULT_VISIBLE_HEIGHT, DEFAULT_WIDTH, INITIAL_RATE_MS, LOCK_DELAY_CAP_MS, LOCK_LENIENCY_MS,
    MAX_LOCK_WAITS, MIN_RATE_MS, SCORE_RATE_CEILING,
};

/// Board dimensions and timing knobs for one game.
///
/// Construct with `GameConfig::default()` and override fields, then pass through
/// `validate()` (done by `Game::with_config`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: usize,
    pub visible_height: i32,

    pub initial_rate_ms: u64,
    pub min_rate_ms: u64,

    pub lock_leniency_ms: u64,
    pub max_lock_waits: u32,
    pub lock_delay_cap_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            visible_height: DEFAULT_VISIBLE_HEIGHT,
            initial_rate_ms: INITIAL_RATE_MS,
            min_rate_ms: MIN_RATE_MS,
            lock_leniency_ms: LOCK_LENIENCY_MS,
            max_lock_waits: MAX_LOCK_WAITS,
            lock_delay_cap_ms: LOCK_DELAY_CAP_MS,
        }
    }
}

impl GameConfig {
    /// Smallest board that still fits every variant in every rotation.
    pub const MIN_DIM: usize = 4;
    /// Widest board accepted; keeps column math in `i32`.
    pub const MAX_WIDTH: usize = 1024;

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.width < Self::MIN_DIM {
            return Err(ConfigError::WidthTooSmall(self.width));
        }
        if self.width > Self::MAX_WIDTH {
            return Err(ConfigError::WidthTooLarge(self.width));
        }
        if self.visible_height < Self::MIN_DIM as i32 {
            return Err(ConfigError::HeightTooSmall(self.visible_height));
        }
        if self.min_rate_ms == 0 {
            return Err(ConfigError::ZeroMinRate);
        }
        if self.min_rate_ms > self.initial_rate_ms {
            return Err(ConfigError::RateOrder {
                initial: self.initial_rate_ms,
                min: self.min_rate_ms,
            });
        }
        if self.initial_rate_ms > SCORE_RATE_CEILING {
            return Err(ConfigError::RateAboveCeiling(self.initial_rate_ms));
        }
        Ok(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    WidthTooSmall(usize),
    WidthTooLarge(usize),
    HeightTooSmall(i32),
    ZeroMinRate,
    RateOrder { initial: u64, min: u64 },
    RateAboveCeiling(u64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::WidthTooSmall(w) => {
                write!(f, "width must be >= {}, got {}", GameConfig::MIN_DIM, w)
            }
            ConfigError::WidthTooLarge(w) => {
                write!(f, "width must be <= {}, got {}", GameConfig::MAX_WIDTH, w)
            }
            ConfigError::HeightTooSmall(h) => {
                write!(f, "visible height must be >= {}, got {}", GameConfig::MIN_DIM, h)
            }
            ConfigError::ZeroMinRate => write!(f, "min rate must be > 0 ms"),
            ConfigError::RateOrder { initial, min } => write!(
                f,
                "min rate ({} ms) must not exceed initial rate ({} ms)",
                min, initial
            ),
            ConfigError::RateAboveCeiling(r) => write!(
                f,
                "initial rate must be <= {} ms (score multiplier would go negative), got {}",
                SCORE_RATE_CEILING, r
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
