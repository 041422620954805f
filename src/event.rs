use std::fmt;

use crate::board::Board;
use crate::error::ReplayError;
use crate::square::Square;

/// Emitted once per placement or removal, in search order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notification {
    /// The knight moved onto `square` as move number `step_index`.
    Step { step_index: usize, square: Square },
    /// `square` was taken back off the path.
    Backtrack { square: Square },
}

impl Notification {
    pub fn step(step_index: usize, square: Square) -> Self {
        Notification::Step { step_index, square }
    }

    pub fn backtrack(square: Square) -> Self {
        Notification::Backtrack { square }
    }

    pub fn square(&self) -> Square {
        match self {
            Notification::Step { square, .. } | Notification::Backtrack { square } => *square,
        }
    }

    pub fn is_backtrack(&self) -> bool {
        matches!(self, Notification::Backtrack { .. })
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Step { step_index, square } => {
                write!(f, "Step {}: move to {}", step_index, square)
            }
            Notification::Backtrack { square } => write!(f, "Backtrack from {}", square),
        }
    }
}

/// A recorded notification stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trace {
    events: Vec<Notification>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: Notification) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[Notification] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn steps(&self) -> usize {
        self.events.iter().filter(|e| !e.is_backtrack()).count()
    }

    pub fn backtracks(&self) -> usize {
        self.events.iter().filter(|e| e.is_backtrack()).count()
    }

    /// Re-apply the recorded events to a fresh board starting at `start`
    /// and return the path left standing at the end.
    pub fn replay(&self, board_size: usize, start: Square) -> Result<Vec<Square>, ReplayError> {
        let size = crate::solver::check_board_size(board_size)?;
        crate::solver::check_start(start.x as usize, start.y as usize, size)?;

        let mut board = Board::new(size);
        board.mark(&start, 0);
        let mut path = vec![start];

        for event in &self.events {
            match *event {
                Notification::Step { step_index, square } => {
                    if step_index != path.len() {
                        return Err(ReplayError::StepOutOfOrder {
                            expected: path.len(),
                            actual: step_index,
                        });
                    }
                    if !square.is_valid(size) {
                        return Err(ReplayError::StepOffBoard { square });
                    }
                    if !board.is_open(&square) {
                        return Err(ReplayError::StepOntoVisited { square });
                    }
                    let from = path[path.len() - 1];
                    if !from.is_knight_move_to(&square) {
                        return Err(ReplayError::NotAKnightMove { from, to: square });
                    }
                    board.mark(&square, step_index as u16);
                    path.push(square);
                }
                Notification::Backtrack { square } => {
                    if path.len() < 2 || path[path.len() - 1] != square {
                        return Err(ReplayError::BacktrackMismatch {
                            expected: (path.len() > 1).then(|| path[path.len() - 1]),
                            actual: square,
                        });
                    }
                    board.unmark(&square);
                    path.pop();
                }
            }
        }

        Ok(path)
    }
}

impl Extend<Notification> for Trace {
    fn extend<T: IntoIterator<Item = Notification>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

impl FromIterator<Notification> for Trace {
    fn from_iter<T: IntoIterator<Item = Notification>>(iter: T) -> Self {
        Trace {
            events: iter.into_iter().collect(),
        }
    }
}
