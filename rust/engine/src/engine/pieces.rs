// rust/engine/src/engine/pieces.rs
#![forbid(unsafe_code)]

use serde::Serialize;

use crate::engine::cell::Color;
use crate::engine::constants::PIECE_CELLS;

/// The 7 canonical piece variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Variant {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

/// Where a variant rotates around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationCenter {
    /// Pivot sits on a cell; rotation is a plain quarter turn about it.
    Cell,
    /// Pivot sits on a cell corner; the piece flips between two states.
    HalfCell,
}

impl Variant {
    /// Catalog order; also the order a fresh bag is filled in before shuffling.
    pub fn all() -> &'static [Variant] {
        use Variant::*;
        &[I, J, L, O, S, T, Z]
    }

    pub fn glyph(self) -> char {
        use Variant::*;
        match self {
            I => 'I',
            J => 'J',
            L => 'L',
            O => 'O',
            S => 'S',
            T => 'T',
            Z => 'Z',
        }
    }

    pub fn color(self) -> Color {
        use Variant::*;
        match self {
            I => Color::rgb(0x00FFFF),
            J => Color::rgb(0x0000FF),
            L => Color::rgb(0xFFA500),
            O => Color::rgb(0xFFFF00),
            S => Color::rgb(0x00FF00),
            T => Color::rgb(0xB000B0),
            Z => Color::rgb(0xFF0000),
        }
    }

    pub fn rotation_center(self) -> RotationCenter {
        match self {
            Variant::I | Variant::O => RotationCenter::HalfCell,
            _ => RotationCenter::Cell,
        }
    }

    /// Spawn-orientation offsets from the pivot (y grows upward).
    pub fn offsets(self) -> &'static [(i32, i32); PIECE_CELLS] {
        use Variant::*;
        match self {
            I => &[(0, 1), (0, 0), (0, -1), (0, -2)],
            J => &[(0, 1), (0, 0), (0, -1), (-1, -1)],
            L => &[(0, 1), (0, 0), (0, -1), (1, -1)],
            O => &[(0, 0), (0, -1), (-1, 0), (-1, -1)],
            S => &[(0, 1), (0, 0), (1, 0), (1, -1)],
            T => &[(0, 1), (0, 0), (0, -1), (-1, 0)],
            Z => &[(0, 1), (0, 0), (-1, 0), (-1, -1)],
        }
    }
}
