// rust/engine/src/engine/game.rs
#![forbid(unsafe_code)]

use std::mem;

use serde::Serialize;

use crate::engine::bag::Bag;
use crate::engine::cell::{Cell, Color, PieceId};
use crate::engine::config::{ConfigError, GameConfig};
use crate::engine::grid::{Grid, compute_score};
use crate::engine::piece::{Footprint, Piece, Shift, Turn};
use crate::engine::pieces::Variant;

/// Whether a hold counts against the once-per-spawn allowance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldPolicy {
    /// Human input: at most one hold between consecutive spawns.
    OncePerSpawn,
    /// Automated player: unrestricted, and does not consume the allowance.
    Unlimited,
}

/// Mutating commands an input layer (or the bot) issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateLeft,
    RotateRight,
    HardDrop,
    Hold,
    Pause,
}

/// What one gravity tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused or ended; nothing changed.
    Idle,
    /// The active piece tried to fall and still has room below.
    Falling,
    /// The active piece is grounded. The host should call `try_lock(piece)`
    /// after `delay_ms`.
    LockPending { piece: PieceId, delay_ms: u64 },
    /// No active piece: rows were cleared and a new piece spawned.
    Spawned { piece: PieceId, rows_cleared: u32 },
    /// No active piece and the next one could not be spawned.
    ToppedOut { rows_cleared: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PieceView {
    pub variant: Variant,
    pub cells: Vec<CellView>,
}

impl PieceView {
    fn of(piece: &Piece) -> Self {
        let color = piece.variant().color();
        Self {
            variant: piece.variant(),
            cells: piece
                .blocks()
                .iter()
                .map(|&(x, y)| CellView { x, y, color })
                .collect(),
        }
    }
}

/// Read-only state for a rendering layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub width: i32,
    pub visible_height: i32,
    /// Sorted by (y, x).
    pub settled: Vec<CellView>,
    pub active: Option<PieceView>,
    pub shadow: Option<Vec<(i32, i32)>>,
    /// Next/held previews carry catalog offsets, not board positions.
    pub next: PieceView,
    pub held: Option<PieceView>,
    pub score: u64,
    pub rows_cleared: u64,
    pub pieces_placed: u64,
    pub paused: bool,
    pub ended: bool,
    pub rate_ms: u64,
}

/// GameState: grid, active/next/held pieces, bag, counters and flags.
///
/// Time is supplied by the host through `set_clock`; the game never schedules
/// anything itself.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    grid: Grid,
    bag: Bag,

    active: Option<Piece>,
    next: Piece,
    held: Option<Piece>,

    score: u64,
    rows_cleared: u64,
    pieces_placed: u64,

    ended: bool,
    paused: bool,
    rate_ms: u64,

    clock_ms: u64,
    next_piece_id: u64,
}

impl Game {
    /// Default 14x20 board.
    pub fn new(seed: u64) -> Self {
        Self::build(GameConfig::default(), seed)
    }

    pub fn with_config(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self::build(config.validate()?, seed))
    }

    fn build(config: GameConfig, seed: u64) -> Self {
        let mut bag = Bag::new(seed);
        let next = Piece::new(bag.draw());
        Self {
            config,
            grid: Grid::new(config.width, config.visible_height),
            bag,
            active: None,
            next,
            held: None,
            score: 0,
            rows_cleared: 0,
            pieces_placed: 0,
            ended: false,
            paused: false,
            rate_ms: config.initial_rate_ms,
            clock_ms: 0,
            next_piece_id: 1,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Fixture access for tests and benches. Only settled cells should be added.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn held(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    /// Variants left in the current bag cycle (after `next`).
    pub fn bag_remaining(&self) -> &[Variant] {
        self.bag.remaining()
    }

    /// Cumulative cleared-row score.
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn rows_cleared(&self) -> u64 {
        self.rows_cleared
    }

    pub fn pieces_placed(&self) -> u64 {
        self.pieces_placed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn rate_ms(&self) -> u64 {
        self.rate_ms
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Landing footprint of the active piece.
    pub fn shadow(&self) -> Option<Footprint> {
        self.active.as_ref().and_then(|p| p.landing(&self.grid))
    }

    pub fn settled_cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.settled_cells()
    }

    pub fn active_cells(&self) -> Vec<Cell> {
        match &self.active {
            Some(p) => self.grid.cells_of(p.id()).copied().collect(),
            None => Vec::new(),
        }
    }

    #[inline]
    fn accepting(&self) -> bool {
        !self.paused && !self.ended
    }

    // -------------------------------------------------------------------------
    // Clock + gravity
    // -------------------------------------------------------------------------

    pub fn set_clock(&mut self, now_ms: u64) {
        self.clock_ms = now_ms;
    }

    /// One gravity tick.
    ///
    /// With an active piece: try to move it down, and report `LockPending` if it is
    /// now grounded. Without one: clear full rows, credit the score, spawn the next
    /// piece. Then check for game over and speed up by 1 ms (down to the floor).
    pub fn advance(&mut self) -> TickOutcome {
        if !self.accepting() {
            return TickOutcome::Idle;
        }

        let outcome = if self.active.is_some() {
            self.fall_active()
        } else {
            self.clear_and_spawn()
        };

        self.check_game_over();
        if self.rate_ms > self.config.min_rate_ms {
            self.rate_ms -= 1;
        }
        outcome
    }

    fn fall_active(&mut self) -> TickOutcome {
        let now = self.clock_ms;
        let Some(piece) = self.active.as_mut() else {
            return TickOutcome::Falling;
        };
        piece.translate(&self.grid, Shift::Down, now);
        let id = piece.id();
        let grounded = !piece.can_descend(&self.grid);
        self.sync_active();

        if grounded {
            TickOutcome::LockPending {
                piece: id,
                delay_ms: self.config.lock_delay_cap_ms.min(self.rate_ms),
            }
        } else {
            TickOutcome::Falling
        }
    }

    /// Fire-time half of the lock-in: locks only if `piece` is still the active
    /// spawn, still grounded, and its leniency (idle time or wait count) is used up.
    pub fn try_lock(&mut self, piece: PieceId) -> bool {
        if !self.accepting() {
            return false;
        }
        let Some(active) = self.active.as_ref() else {
            return false;
        };
        if active.id() != piece || active.can_descend(&self.grid) {
            return false;
        }
        let idle = self.clock_ms.saturating_sub(active.last_moved_ms());
        if idle < self.config.lock_leniency_ms && active.waits() <= self.config.max_lock_waits {
            return false;
        }
        self.end_active()
    }

    fn clear_and_spawn(&mut self) -> TickOutcome {
        let rows = self.grid.clear_full_rows();
        self.score += compute_score(rows, self.rate_ms);
        self.rows_cleared += u64::from(rows);

        match self.spawn_next() {
            Some(piece) => TickOutcome::Spawned {
                piece,
                rows_cleared: rows,
            },
            None => TickOutcome::ToppedOut { rows_cleared: rows },
        }
    }

    fn check_game_over(&mut self) {
        if self.grid.is_game_over() {
            self.ended = true;
        }
    }

    // -------------------------------------------------------------------------
    // Spawning
    // -------------------------------------------------------------------------

    fn spawn_next(&mut self) -> Option<PieceId> {
        let incoming = mem::replace(&mut self.next, Piece::new(self.bag.draw()));
        self.spawn(incoming)
    }

    fn spawn(&mut self, mut piece: Piece) -> Option<PieceId> {
        let id = PieceId(self.next_piece_id);
        self.next_piece_id += 1;

        if !piece.place_at_spawn(id, &self.grid, self.clock_ms) {
            self.active = None;
            self.ended = true;
            return None;
        }

        let color = piece.variant().color();
        let blocks = *piece.blocks();
        let ids = blocks.map(|(x, y)| {
            self.grid.insert(Cell {
                x,
                y,
                color,
                owner: Some(id),
            })
        });
        piece.cell_ids = Some(ids);
        self.active = Some(piece);
        Some(id)
    }

    /// Fixture helper: discard the active piece (if any) and spawn `variant` instead.
    pub fn replace_active(&mut self, variant: Variant) -> Option<PieceId> {
        if let Some(old) = self.active.take() {
            if let Some(ids) = old.cell_ids {
                for id in ids {
                    self.grid.remove(id);
                }
            }
        }
        self.spawn(Piece::new(variant))
    }

    /// Mirrors the active piece's blocks into its grid cells.
    fn sync_active(&mut self) {
        let Some(piece) = self.active.as_ref() else {
            return;
        };
        let Some(ids) = piece.cell_ids else {
            return;
        };
        for (id, &(x, y)) in ids.iter().zip(piece.blocks()) {
            self.grid.move_active(*id, x, y);
        }
    }

    /// Drops the active piece to its landing row and settles its cells.
    fn end_active(&mut self) -> bool {
        let Some(mut piece) = self.active.take() else {
            return false;
        };
        while piece.can_descend(&self.grid) {
            piece.translate(&self.grid, Shift::Down, self.clock_ms);
        }
        if let Some(ids) = piece.cell_ids {
            for (id, &(x, y)) in ids.iter().zip(piece.blocks()) {
                self.grid.move_active(*id, x, y);
                self.grid.settle(*id);
            }
        }
        self.pieces_placed += 1;
        true
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    fn shift_active(&mut self, shift: Shift) -> bool {
        if !self.accepting() {
            return false;
        }
        let now = self.clock_ms;
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let applied = piece.translate(&self.grid, shift, now);
        if applied {
            self.sync_active();
        }
        applied
    }

    fn turn_active(&mut self, turn: Turn) -> bool {
        if !self.accepting() {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        let applied = piece.rotate(&self.grid, turn);
        if applied {
            self.sync_active();
        }
        applied
    }

    pub fn move_left(&mut self) -> bool {
        self.shift_active(Shift::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift_active(Shift::Right)
    }

    pub fn soft_drop(&mut self) -> bool {
        self.shift_active(Shift::Down)
    }

    pub fn rotate_left(&mut self) -> bool {
        self.turn_active(Turn::Left)
    }

    pub fn rotate_right(&mut self) -> bool {
        self.turn_active(Turn::Right)
    }

    /// Lock the active piece at its landing row, then run the spawn half of a tick
    /// (clear rows, spawn next, game-over check). Does not change the rate.
    pub fn hard_drop(&mut self) -> bool {
        if !self.accepting() {
            return false;
        }
        self.end_active();
        self.clear_and_spawn();
        self.check_game_over();
        true
    }

    /// Human hold: once per spawn.
    pub fn hold(&mut self) -> bool {
        self.hold_with(HoldPolicy::OncePerSpawn)
    }

    /// Swap the active piece into the held slot and bring back the previously held
    /// piece (or draw the next one). The outgoing piece leaves the grid unsettled.
    pub fn hold_with(&mut self, policy: HoldPolicy) -> bool {
        if !self.accepting() {
            return false;
        }
        let Some(active) = self.active.as_ref() else {
            return false;
        };
        if policy == HoldPolicy::OncePerSpawn && active.hold_used() {
            return false;
        }

        let Some(mut outgoing) = self.active.take() else {
            return false;
        };
        if let Some(ids) = outgoing.cell_ids {
            for id in ids {
                self.grid.remove(id);
            }
        }
        outgoing.reset_shape();

        let spawned = match self.held.replace(outgoing) {
            Some(previous) => self.spawn(previous),
            None => self.spawn_next(),
        };

        if spawned.is_some() && policy == HoldPolicy::OncePerSpawn {
            if let Some(p) = self.active.as_mut() {
                p.hold_used = true;
            }
        }
        true
    }

    /// Toggles pause; returns the new paused state. An ended game stays as it is.
    pub fn pause(&mut self) -> bool {
        if !self.ended {
            self.paused = !self.paused;
        }
        self.paused
    }

    /// Back to the initial lifecycle point: empty grid, no active/held piece,
    /// fresh bag and next piece, zeroed counters, initial rate.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.active = None;
        self.held = None;
        self.bag.refill();
        self.next = Piece::new(self.bag.draw());
        self.score = 0;
        self.rows_cleared = 0;
        self.pieces_placed = 0;
        self.ended = false;
        self.paused = false;
        self.rate_ms = self.config.initial_rate_ms;
    }

    pub fn apply(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::SoftDrop => self.soft_drop(),
            Command::RotateLeft => self.rotate_left(),
            Command::RotateRight => self.rotate_right(),
            Command::HardDrop => self.hard_drop(),
            Command::Hold => self.hold(),
            Command::Pause => {
                self.pause();
                true
            }
        }
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    pub fn snapshot(&self) -> GameSnapshot {
        let mut settled: Vec<CellView> = self
            .grid
            .settled_cells()
            .map(|c| CellView {
                x: c.x,
                y: c.y,
                color: c.color,
            })
            .collect();
        settled.sort_by_key(|c| (c.y, c.x));

        let mut next = PieceView::of(&self.next);
        next.cells.sort_by_key(|c| (c.y, c.x));

        GameSnapshot {
            width: self.grid.width(),
            visible_height: self.grid.visible_height(),
            settled,
            active: self.active.as_ref().map(PieceView::of),
            shadow: self.shadow().map(|fp| fp.key().to_vec()),
            next,
            held: self.held.as_ref().map(PieceView::of),
            score: self.score,
            rows_cleared: self.rows_cleared,
            pieces_placed: self.pieces_placed,
            paused: self.paused,
            ended: self.ended,
            rate_ms: self.rate_ms,
        }
    }

    pub fn render_ascii(&self) -> String {
        let w = self.grid.width();
        let shadow = self.shadow();
        let active = self.active.as_ref().map(|p| p.footprint());

        let mut s = String::new();
        let border = format!("+{}+\n", "-".repeat(w as usize));
        s.push_str(&border);
        for y in (0..self.grid.visible_height()).rev() {
            s.push('|');
            for x in 0..w {
                let ch = if self.grid.is_settled_at(x, y) {
                    '#'
                } else if active.is_some_and(|fp| fp.contains(x, y)) {
                    '@'
                } else if shadow.is_some_and(|fp| fp.contains(x, y)) {
                    ':'
                } else {
                    ' '
                };
                s.push(ch);
            }
            s.push_str("|\n");
        }
        s.push_str(&border);
        s.push_str(&format!(
            "active={} next={} held={} score={} rows={} placed={} rate={}ms paused={} over={}\n",
            self.active.as_ref().map_or('-', |p| p.variant().glyph()),
            self.next.variant().glyph(),
            self.held.as_ref().map_or('-', |p| p.variant().glyph()),
            self.score,
            self.rows_cleared,
            self.pieces_placed,
            self.rate_ms,
            self.paused,
            self.ended
        ));
        s
    }
}
