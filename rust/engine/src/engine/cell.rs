// rust/engine/src/engine/cell.rs
#![forbid(unsafe_code)]

use std::fmt;

use serde::Serialize;

/// Stable arena slot of a cell inside a `Grid`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellId(pub(crate) usize);

/// Identity of one *life* of a piece: a fresh id is handed out on every spawn,
/// so a held piece that comes back into play is a different instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PieceId(pub u64);

/// 24-bit RGB color tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Color(pub u32);

impl Color {
    pub const fn rgb(hex: u32) -> Self {
        Self(hex & 0x00FF_FFFF)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// One occupied grid position.
///
/// `owner == None` means the cell is settled (part of the static stack);
/// otherwise it belongs to the in-flight piece with that id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub color: Color,
    pub owner: Option<PieceId>,
}

impl Cell {
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.owner.is_none()
    }

    #[inline]
    pub fn pos(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}
