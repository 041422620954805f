use std::error::Error;
use std::fmt;

use crate::r#move::Offset;
use crate::square::Square;

/// Caller-input errors, detected before any board mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveError {
    InvalidBoardSize { size: usize },
    InvalidStart { x: usize, y: usize, size: usize },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::InvalidBoardSize { size } => write!(
                f,
                "invalid board size {size}: must be between 1 and {}",
                crate::board::MAX_BOARD_SIZE
            ),
            SolveError::InvalidStart { x, y, size } => {
                write!(f, "start ({x}, {y}) is outside the {size}x{size} board")
            }
        }
    }
}

impl Error for SolveError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveTableError {
    NotAKnightMove(Offset),
    Duplicate(Offset),
}

impl fmt::Display for MoveTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveTableError::NotAKnightMove(o) => write!(f, "offset {o} is not a knight move"),
            MoveTableError::Duplicate(o) => write!(f, "offset {o} appears more than once"),
        }
    }
}

impl Error for MoveTableError {}

/// Reasons a square sequence is not a complete knight's tour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TourError {
    InvalidBoardSize { size: usize },
    WrongLength { expected: usize, actual: usize },
    OffBoard { index: usize, square: Square },
    Revisited { index: usize, square: Square },
    NotAKnightMove { index: usize, from: Square, to: Square },
}

impl fmt::Display for TourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourError::InvalidBoardSize { size } => write!(f, "invalid board size {size}"),
            TourError::WrongLength { expected, actual } => {
                write!(f, "tour has {actual} squares, expected {expected}")
            }
            TourError::OffBoard { index, square } => {
                write!(f, "square {square} at index {index} is off the board")
            }
            TourError::Revisited { index, square } => {
                write!(f, "square {square} is visited again at index {index}")
            }
            TourError::NotAKnightMove { index, from, to } => {
                write!(f, "{from} -> {to} at index {index} is not a knight move")
            }
        }
    }
}

impl Error for TourError {}

/// A recorded event sequence that does not describe a legal search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayError {
    Start(SolveError),
    StepOutOfOrder { expected: usize, actual: usize },
    StepOntoVisited { square: Square },
    StepOffBoard { square: Square },
    NotAKnightMove { from: Square, to: Square },
    BacktrackMismatch { expected: Option<Square>, actual: Square },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Start(e) => write!(f, "{e}"),
            ReplayError::StepOutOfOrder { expected, actual } => {
                write!(f, "step {actual} recorded where step {expected} was expected")
            }
            ReplayError::StepOntoVisited { square } => {
                write!(f, "step onto already visited square {square}")
            }
            ReplayError::StepOffBoard { square } => write!(f, "step onto off-board square {square}"),
            ReplayError::NotAKnightMove { from, to } => {
                write!(f, "{from} -> {to} is not a knight move")
            }
            ReplayError::BacktrackMismatch { expected, actual } => match expected {
                Some(tip) => write!(f, "backtrack from {actual} but the path ends at {tip}"),
                None => write!(f, "backtrack from {actual} past the start square"),
            },
        }
    }
}

impl Error for ReplayError {}

impl From<SolveError> for ReplayError {
    fn from(e: SolveError) -> Self {
        ReplayError::Start(e)
    }
}
