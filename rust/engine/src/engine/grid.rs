// rust/engine/src/engine/grid.rs
#![forbid(unsafe_code)]

use rustc_hash::FxHashMap;

use crate::engine::cell::{Cell, CellId, Color, PieceId};
use crate::engine::constants::SCORE_RATE_CEILING;

/// Score credited for clearing `rows` rows at gravity `rate_ms`.
///
/// Quadratic in `rows`; faster play (lower rate) raises the multiplier.
pub fn compute_score(rows: u32, rate_ms: u64) -> u64 {
    let mult = (SCORE_RATE_CEILING as f64 - rate_ms as f64) / 100.0;
    let r = rows as f64;
    (mult * r * r * 100.0).round().max(0.0) as u64
}

/// Flat arena of cells plus a position index over the *settled* ones.
///
/// Active-piece cells live in the arena too, but are not indexed: collision
/// checks only ever look at the settled stack.
#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    visible_height: i32,

    slots: Vec<Option<Cell>>,
    free: Vec<usize>,
    settled: FxHashMap<(i32, i32), CellId>,
}

impl Grid {
    pub fn new(width: usize, visible_height: i32) -> Self {
        Self {
            width: width as i32,
            visible_height,
            slots: Vec::new(),
            free: Vec::new(),
            settled: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn visible_height(&self) -> i32 {
        self.visible_height
    }

    /// In bounds (no upper bound on `y`) and not covered by a settled cell.
    #[inline]
    pub fn can_place(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && !self.settled.contains_key(&(x, y))
    }

    #[inline]
    pub fn is_settled_at(&self, x: i32, y: i32) -> bool {
        self.settled.contains_key(&(x, y))
    }

    // -------------------------------------------------------------------------
    // Arena
    // -------------------------------------------------------------------------

    /// Adds a cell. Settled cells are indexed immediately; callers have already
    /// checked the position with `can_place`.
    pub(crate) fn insert(&mut self, cell: Cell) -> CellId {
        let id = match self.free.pop() {
            Some(i) => {
                self.slots[i] = Some(cell);
                CellId(i)
            }
            None => {
                self.slots.push(Some(cell));
                CellId(self.slots.len() - 1)
            }
        };
        if cell.is_settled() {
            debug_assert!(!self.settled.contains_key(&cell.pos()), "settled overlap");
            self.settled.insert(cell.pos(), id);
        }
        id
    }

    pub(crate) fn remove(&mut self, id: CellId) -> Option<Cell> {
        let cell = self.slots.get_mut(id.0)?.take()?;
        if cell.is_settled() {
            self.settled.remove(&cell.pos());
        }
        self.free.push(id.0);
        Some(cell)
    }

    /// Moves an active cell. Settled cells only move through `clear_full_rows`.
    pub(crate) fn move_active(&mut self, id: CellId, x: i32, y: i32) {
        if let Some(Some(c)) = self.slots.get_mut(id.0) {
            debug_assert!(!c.is_settled());
            c.x = x;
            c.y = y;
        }
    }

    /// Drops the owner of an active cell, making it part of the stack.
    pub(crate) fn settle(&mut self, id: CellId) {
        if let Some(Some(c)) = self.slots.get_mut(id.0) {
            if c.owner.take().is_some() {
                debug_assert!(!self.settled.contains_key(&c.pos()), "settled overlap");
                self.settled.insert(c.pos(), id);
            }
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.slots.iter().flatten()
    }

    pub fn settled_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells().filter(|c| c.is_settled())
    }

    pub fn cells_of(&self, piece: PieceId) -> impl Iterator<Item = &Cell> {
        self.cells().filter(move |c| c.owner == Some(piece))
    }

    pub fn settled_count(&self) -> usize {
        self.settled.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.settled.clear();
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Settled cells in row `y`.
    pub fn row_count(&self, y: i32) -> usize {
        (0..self.width).filter(|&x| self.is_settled_at(x, y)).count()
    }

    /// Removes every full visible row and shifts the settled cells above down by
    /// the number of cleared rows beneath them. Single sweep; returns rows cleared.
    pub fn clear_full_rows(&mut self) -> u32 {
        let full: Vec<i32> = (0..self.visible_height)
            .filter(|&y| self.row_count(y) == self.width as usize)
            .collect();
        if full.is_empty() {
            return 0;
        }

        let doomed: Vec<CellId> = self
            .settled
            .iter()
            .filter(|((_, y), _)| full.contains(y))
            .map(|(_, &id)| id)
            .collect();
        for id in doomed {
            self.remove(id);
        }

        let survivors: Vec<CellId> = self.settled.values().copied().collect();
        self.settled.clear();
        for id in survivors {
            if let Some(Some(c)) = self.slots.get_mut(id.0) {
                let below = full.iter().filter(|&&r| r < c.y).count() as i32;
                c.y -= below;
                self.settled.insert(c.pos(), id);
            }
        }

        full.len() as u32
    }

    /// Any settled cell above the visible area.
    pub fn is_game_over(&self) -> bool {
        self.settled.keys().any(|&(_, y)| y > self.visible_height)
    }

    /// Any settled cell with `y > min_y`.
    pub fn has_settled_above(&self, min_y: i32) -> bool {
        self.settled.keys().any(|&(_, y)| y > min_y)
    }

    /// Height of the settled stack: highest settled `y` + 1, or 0 when empty.
    pub fn skyline(&self) -> i32 {
        self.settled.keys().map(|&(_, y)| y + 1).max().unwrap_or(0)
    }

    /// Column height: highest settled `y` + 1 in column `x`, or 0.
    pub fn column_height(&self, x: i32) -> i32 {
        self.settled
            .keys()
            .filter(|&&(cx, _)| cx == x)
            .map(|&(_, y)| y + 1)
            .max()
            .unwrap_or(0)
    }

    /// Returns (max_height, avg_height) over all columns.
    pub fn height_metrics(&self) -> (i32, f32) {
        let mut heights = vec![0i32; self.width as usize];
        for &(x, y) in self.settled.keys() {
            let h = &mut heights[x as usize];
            *h = (*h).max(y + 1);
        }
        let max_h = heights.iter().copied().max().unwrap_or(0);
        let avg = heights.iter().sum::<i32>() as f32 / (self.width as f32);
        (max_h, avg)
    }

    /// Test/fixture helper: fill positions with settled cells of `color`.
    /// Positions that are out of bounds or already settled are skipped; returns
    /// how many cells were added.
    pub fn fill_settled(&mut self, cells: &[(i32, i32)], color: Color) -> usize {
        let mut added = 0;
        for &(x, y) in cells {
            if self.can_place(x, y) {
                self.insert(Cell {
                    x,
                    y,
                    color,
                    owner: None,
                });
                added += 1;
            }
        }
        added
    }
}
