use std::fmt;

use crate::error::MoveTableError;

/// A knight displacement: `dx` along rows, `dy` along columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dx: i8,
    pub dy: i8,
}

impl Offset {
    pub const fn new(dx: i8, dy: i8) -> Self {
        Offset { dx, dy }
    }

    pub fn is_knight_move(&self) -> bool {
        matches!(
            (self.dx.unsigned_abs(), self.dy.unsigned_abs()),
            (1, 2) | (2, 1)
        )
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+}, {:+})", self.dx, self.dy)
    }
}

/// The eight knight displacements in their canonical enumeration order.
/// Equal-degree candidates are tried in this order.
pub const KNIGHT_OFFSETS: [Offset; 8] = [
    Offset::new(2, 1),
    Offset::new(1, 2),
    Offset::new(-1, 2),
    Offset::new(-2, 1),
    Offset::new(-2, -1),
    Offset::new(-1, -2),
    Offset::new(1, -2),
    Offset::new(2, -1),
];

/// Enumeration order of the knight offsets used during move generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveTable {
    offsets: [Offset; 8],
}

impl MoveTable {
    pub fn knight() -> Self {
        MoveTable {
            offsets: KNIGHT_OFFSETS,
        }
    }

    /// Accepts any ordering of the eight knight displacements.
    pub fn from_offsets(offsets: [Offset; 8]) -> Result<Self, MoveTableError> {
        for (i, offset) in offsets.iter().enumerate() {
            if !offset.is_knight_move() {
                return Err(MoveTableError::NotAKnightMove(*offset));
            }
            if offsets[..i].contains(offset) {
                return Err(MoveTableError::Duplicate(*offset));
            }
        }
        Ok(MoveTable { offsets })
    }

    #[inline]
    pub fn offsets(&self) -> &[Offset; 8] {
        &self.offsets
    }

    pub fn iter(&self) -> impl Iterator<Item = Offset> + '_ {
        self.offsets.iter().copied()
    }
}

impl Default for MoveTable {
    fn default() -> Self {
        Self::knight()
    }
}
