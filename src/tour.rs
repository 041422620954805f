use std::fmt;

use crate::board::MAX_BOARD_SIZE;
use crate::error::TourError;
use crate::square::Square;

/// A complete knight's tour: every square of an N×N board exactly once,
/// consecutive squares a knight move apart.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tour {
    size: u8,
    squares: Vec<Square>,
}

impl Tour {
    /// Validate `squares` as a complete open tour of a `board_size` board.
    pub fn from_squares(board_size: usize, squares: Vec<Square>) -> Result<Self, TourError> {
        if !(1..=MAX_BOARD_SIZE as usize).contains(&board_size) {
            return Err(TourError::InvalidBoardSize { size: board_size });
        }
        let size = board_size as u8;
        validate(size, &squares)?;
        Ok(Tour { size, squares })
    }

    /// Wrap a path the search has already proven complete.
    pub(crate) fn from_search(size: u8, squares: Vec<Square>) -> Self {
        debug_assert_eq!(validate(size, &squares), Ok(()));
        Tour { size, squares }
    }

    pub fn board_size(&self) -> u8 {
        self.size
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn into_squares(self) -> Vec<Square> {
        self.squares
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn start(&self) -> Square {
        self.squares[0]
    }

    pub fn end(&self) -> Square {
        self.squares[self.squares.len() - 1]
    }

    /// True if the last square is a knight move from the first.
    pub fn is_closed(&self) -> bool {
        self.len() > 1 && self.end().is_knight_move_to(&self.start())
    }

    /// `(x, y)` pairs in visit order.
    pub fn coordinates(&self) -> Vec<(usize, usize)> {
        self.squares
            .iter()
            .map(|s| (s.x as usize, s.y as usize))
            .collect()
    }

    /// Visit index of every cell, indexed `[x][y]`.
    pub fn to_grid(&self) -> Vec<Vec<usize>> {
        let n = self.size as usize;
        let mut grid = vec![vec![0; n]; n];
        for (i, sq) in self.squares.iter().enumerate() {
            grid[sq.x as usize][sq.y as usize] = i;
        }
        grid
    }
}

fn validate(size: u8, squares: &[Square]) -> Result<(), TourError> {
    let area = size as usize * size as usize;
    if squares.len() != area {
        return Err(TourError::WrongLength {
            expected: area,
            actual: squares.len(),
        });
    }

    let mut seen = vec![false; area];
    for (index, square) in squares.iter().enumerate() {
        if !square.is_valid(size) {
            return Err(TourError::OffBoard {
                index,
                square: *square,
            });
        }
        let cell = square.to_index(size);
        if seen[cell] {
            return Err(TourError::Revisited {
                index,
                square: *square,
            });
        }
        seen[cell] = true;

        if index > 0 {
            let from = squares[index - 1];
            if !from.is_knight_move_to(square) {
                return Err(TourError::NotAKnightMove {
                    index,
                    from,
                    to: *square,
                });
            }
        }
    }
    Ok(())
}

/// Numbered board, counting visits from 1.
impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.len().to_string().len();
        for row in self.to_grid() {
            write!(f, "|")?;
            for index in row {
                write!(f, "{:>width$}|", index + 1)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
