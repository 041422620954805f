use std::fmt;

use crate::square::Square;

pub const STANDARD_SIZE: u8 = 8;

/// Largest supported board edge. Visit indices stay below `u16::MAX`.
pub const MAX_BOARD_SIZE: u8 = u8::MAX;

/// An N×N board recording, for each cell, the move index at which the
/// knight occupied it. `None` marks an unvisited cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: Vec<Option<u16>>,
    size: u8,
    occupied: usize,
}

impl Board {
    pub fn new(size: u8) -> Self {
        Board {
            cells: vec![None; size as usize * size as usize],
            size,
            occupied: 0,
        }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells currently holding a visit index.
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    pub fn get(&self, sq: &Square) -> Option<u16> {
        if sq.is_valid(self.size) {
            self.cells[sq.to_index(self.size)]
        } else {
            None
        }
    }

    /// True iff `(x, y)` lies on the board and has not been visited.
    /// Out-of-range coordinates are rejected without touching the grid.
    #[inline]
    pub fn is_valid(&self, x: isize, y: isize) -> bool {
        let n = self.size as isize;
        (0..n).contains(&x)
            && (0..n).contains(&y)
            && self.cells[x as usize * self.size as usize + y as usize].is_none()
    }

    #[inline]
    pub fn is_open(&self, sq: &Square) -> bool {
        sq.is_valid(self.size) && self.cells[sq.to_index(self.size)].is_none()
    }

    /// Record that the knight reached `sq` on move `index`.
    /// The caller must ensure the square is open.
    #[inline]
    pub(crate) fn mark(&mut self, sq: &Square, index: u16) {
        let idx = sq.to_index(self.size);
        debug_assert!(self.cells[idx].is_none(), "{sq} is already visited");
        self.cells[idx] = Some(index);
        self.occupied += 1;
    }

    /// Return `sq` to the unvisited state.
    #[inline]
    pub(crate) fn unmark(&mut self, sq: &Square) {
        let idx = sq.to_index(self.size);
        debug_assert!(self.cells[idx].is_some(), "{sq} is not visited");
        self.cells[idx] = None;
        self.occupied -= 1;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(STANDARD_SIZE)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.area().saturating_sub(1).to_string().len();
        for x in 0..self.size {
            write!(f, "|")?;
            for y in 0..self.size {
                match self.get(&Square::new(x, y)) {
                    Some(index) => write!(f, "{:>width$}|", index)?,
                    None => write!(f, "{:>width$}|", '.')?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
