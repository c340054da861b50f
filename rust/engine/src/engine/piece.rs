// rust/engine/src/engine/piece.rs
#![forbid(unsafe_code)]

use std::hash::{Hash, Hasher};

use crate::engine::cell::{CellId, PieceId};
use crate::engine::constants::PIECE_CELLS;
use crate::engine::grid::Grid;
use crate::engine::pieces::{RotationCenter, Variant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shift {
    Left,
    Right,
    Down,
}

impl Shift {
    #[inline]
    fn delta(self) -> (i32, i32) {
        match self {
            Shift::Left => (-1, 0),
            Shift::Right => (1, 0),
            Shift::Down => (0, -1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    /// Counter-clockwise.
    Left,
    /// Clockwise.
    Right,
}

/// Absolute positions a piece occupies (or would occupy).
///
/// Equality and hashing are by cell *set*: block order does not matter, which is
/// what lets the move search collapse symmetric rotations.
#[derive(Clone, Copy, Debug)]
pub struct Footprint {
    cells: [(i32, i32); PIECE_CELLS],
}

impl Footprint {
    pub fn new(cells: [(i32, i32); PIECE_CELLS]) -> Self {
        Self { cells }
    }

    #[inline]
    pub fn cells(&self) -> &[(i32, i32); PIECE_CELLS] {
        &self.cells
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.cells.iter().any(|&c| c == (x, y))
    }

    pub fn min_y(&self) -> i32 {
        self.cells.iter().map(|&(_, y)| y).min().unwrap_or(0)
    }

    /// Highest cell; the first one in block order wins ties.
    pub fn top_cell(&self) -> (i32, i32) {
        let mut top = self.cells[0];
        for &c in &self.cells[1..] {
            if c.1 > top.1 {
                top = c;
            }
        }
        top
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            cells: self.cells.map(|(x, y)| (x + dx, y + dy)),
        }
    }

    /// Every cell placeable on `grid` (settled stack + bounds).
    pub fn fits(&self, grid: &Grid) -> bool {
        self.cells.iter().all(|&(x, y)| grid.can_place(x, y))
    }

    /// Sorted cells; the canonical form used for equality.
    pub fn key(&self) -> [(i32, i32); PIECE_CELLS] {
        let mut k = self.cells;
        k.sort_unstable();
        k
    }
}

impl PartialEq for Footprint {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Footprint {}

impl Hash for Footprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// A rigid group of 4 blocks with a pivot.
///
/// Blocks are absolute grid coordinates once spawned and plain catalog offsets
/// (pivot at the origin) while the piece waits in the next/held slot. The piece
/// never touches the grid itself: `Game` mirrors committed block positions into
/// the cells listed in `cell_ids`.
#[derive(Clone, Debug)]
pub struct Piece {
    id: PieceId,
    variant: Variant,
    x: i32,
    y: i32,
    blocks: [(i32, i32); PIECE_CELLS],
    rotation: u8,
    pub(crate) cell_ids: Option<[CellId; PIECE_CELLS]>,
    waits: u32,
    last_moved_ms: u64,
    pub(crate) hold_used: bool,
}

impl Piece {
    pub fn new(variant: Variant) -> Self {
        Self {
            id: PieceId(0),
            variant,
            x: 0,
            y: 0,
            blocks: *variant.offsets(),
            rotation: 0,
            cell_ids: None,
            waits: 0,
            last_moved_ms: 0,
            hold_used: false,
        }
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Pivot position.
    #[inline]
    pub fn pivot(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Rotation state: 0..4 for cell-centered variants, 0..2 for half-cell ones.
    #[inline]
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Consecutive move attempts that ended unable to descend.
    #[inline]
    pub fn waits(&self) -> u32 {
        self.waits
    }

    #[inline]
    pub fn last_moved_ms(&self) -> u64 {
        self.last_moved_ms
    }

    #[inline]
    pub fn hold_used(&self) -> bool {
        self.hold_used
    }

    #[inline]
    pub fn blocks(&self) -> &[(i32, i32); PIECE_CELLS] {
        &self.blocks
    }

    #[inline]
    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.blocks)
    }

    pub fn relative_offsets(&self) -> [(i32, i32); PIECE_CELLS] {
        self.blocks.map(|(bx, by)| (bx - self.x, by - self.y))
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Back to catalog orientation, off the board.
    pub(crate) fn reset_shape(&mut self) {
        self.x = 0;
        self.y = 0;
        self.blocks = *self.variant.offsets();
        self.rotation = 0;
        self.cell_ids = None;
        self.waits = 0;
        self.hold_used = false;
    }

    /// Centered top position; raised when the top rows already hold settled cells.
    pub fn spawn_point(grid: &Grid) -> (i32, i32) {
        let x = (grid.width() + 1) / 2;
        let top = grid.visible_height();
        let y = if grid.has_settled_above(top - 4) {
            top + 3
        } else {
            top - 2
        };
        (x, y)
    }

    /// Positions the piece at the spawn point under a fresh identity.
    /// Returns false if the spawn footprint collides (the caller tops out).
    pub(crate) fn place_at_spawn(&mut self, id: PieceId, grid: &Grid, now_ms: u64) -> bool {
        self.reset_shape();
        let (x, y) = Self::spawn_point(grid);
        self.id = id;
        self.x = x;
        self.y = y;
        self.blocks = self.blocks.map(|(dx, dy)| (x + dx, y + dy));
        self.last_moved_ms = now_ms;
        self.footprint().fits(grid)
    }

    // -------------------------------------------------------------------------
    // Movement
    // -------------------------------------------------------------------------

    pub fn can_descend(&self, grid: &Grid) -> bool {
        self.footprint().translated(0, -1).fits(grid)
    }

    /// One-cell translation. Rejected moves leave the piece in place; either way the
    /// wait counter and move timestamp are updated.
    pub fn translate(&mut self, grid: &Grid, shift: Shift, now_ms: u64) -> bool {
        let (dx, dy) = shift.delta();
        let target = self.footprint().translated(dx, dy);
        let applied = target.fits(grid);
        if applied {
            self.blocks = *target.cells();
            self.x += dx;
            self.y += dy;
        }
        if self.can_descend(grid) {
            self.waits = 0;
        } else {
            self.waits += 1;
        }
        self.last_moved_ms = now_ms;
        applied
    }

    /// Positions after a quarter turn (or half-cell flip), plus the new rotation state.
    pub fn rotated(&self, turn: Turn) -> ([(i32, i32); PIECE_CELLS], u8) {
        let (px, py) = (self.x, self.y);
        match self.variant.rotation_center() {
            RotationCenter::Cell => {
                let blocks = self.blocks.map(|(bx, by)| {
                    let (dx, dy) = (bx - px, by - py);
                    match turn {
                        Turn::Left => (px - dy, py + dx),
                        Turn::Right => (px + dy, py - dx),
                    }
                });
                let rotation = match turn {
                    Turn::Left => (self.rotation + 3) % 4,
                    Turn::Right => (self.rotation + 1) % 4,
                };
                (blocks, rotation)
            }
            // Two states whatever the direction: clockwise out of state 0, back again out of 1.
            RotationCenter::HalfCell => {
                let forward = self.rotation == 0;
                let blocks = self.blocks.map(|(bx, by)| {
                    let (dx, dy) = (bx - px, by - py);
                    if forward {
                        (px + dy, py - dx - 1)
                    } else {
                        (px - dy - 1, py + dx)
                    }
                });
                (blocks, if forward { 1 } else { 0 })
            }
        }
    }

    /// Atomic rotation: applies only if every rotated block is placeable. No kicks.
    pub fn rotate(&mut self, grid: &Grid, turn: Turn) -> bool {
        let (blocks, rotation) = self.rotated(turn);
        if !Footprint::new(blocks).fits(grid) {
            return false;
        }
        self.blocks = blocks;
        self.rotation = rotation;
        true
    }

    // -------------------------------------------------------------------------
    // Projection
    // -------------------------------------------------------------------------

    /// Landing footprint with the pivot moved to column `target_x` at the current
    /// height, then dropped as far as it goes. `None` if that column placement
    /// is already blocked or out of bounds.
    pub fn shadow(&self, grid: &Grid, target_x: i32) -> Option<Footprint> {
        let mut fp = self.footprint().translated(target_x - self.x, 0);
        if !fp.fits(grid) {
            return None;
        }
        loop {
            let lower = fp.translated(0, -1);
            if !lower.fits(grid) {
                return Some(fp);
            }
            fp = lower;
        }
    }

    /// Where a hard drop from the current position would land.
    pub fn landing(&self, grid: &Grid) -> Option<Footprint> {
        self.shadow(grid, self.x)
    }

    /// True if the piece can slide one column at a time, at its current height,
    /// from its pivot column to `target_x`.
    pub fn path_clear(&self, grid: &Grid, target_x: i32) -> bool {
        let step = (target_x - self.x).signum();
        let mut dx = 0;
        while self.x + dx != target_x {
            dx += step;
            if !self.footprint().translated(dx, 0).fits(grid) {
                return false;
            }
        }
        true
    }
}
