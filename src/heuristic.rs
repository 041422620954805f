//! Warnsdorff move ordering: prefer the reachable square with the fewest
//! onward moves.

use crate::board::Board;
use crate::r#move::MoveTable;
use crate::square::Square;

/// True iff `(x, y)` is on the board and unvisited.
#[inline]
pub fn is_valid(x: isize, y: isize, board: &Board) -> bool {
    board.is_valid(x, y)
}

/// Number of knight moves from `(x, y)` that land on a valid cell.
#[hotpath::measure]
pub fn degree(x: isize, y: isize, board: &Board, moves: &MoveTable) -> u8 {
    moves
        .iter()
        .filter(|o| {
            matches!(
                (x.checked_add(o.dx as isize), y.checked_add(o.dy as isize)),
                (Some(nx), Some(ny)) if is_valid(nx, ny, board)
            )
        })
        .count() as u8
}

/// How equal-degree candidates are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TieBreak {
    /// Keep the move table's enumeration order.
    #[default]
    OffsetOrder,
    /// Smaller `x` first, then smaller `y`.
    Coordinates,
}

/// One possible next square, keyed by its onward degree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub degree: u8,
    pub square: Square,
    /// Position of the offset that produced this candidate in the move table.
    pub order: u8,
}

const NO_CANDIDATE: Candidate = Candidate {
    degree: 0,
    square: Square { x: 0, y: 0 },
    order: 0,
};

/// At most eight candidates, sorted by the heuristic.
#[derive(Clone, Copy, Debug)]
pub struct Candidates {
    items: [Candidate; 8],
    len: u8,
}

impl Candidates {
    pub fn as_slice(&self) -> &[Candidate] {
        &self.items[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, i: usize) -> Option<&Candidate> {
        self.as_slice().get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.as_slice().iter()
    }
}

/// Valid moves out of `from`, ordered by ascending degree. Degrees are
/// measured on `board` as it stands, before any candidate is placed.
#[hotpath::measure]
pub fn ordered_candidates(
    from: Square,
    board: &Board,
    moves: &MoveTable,
    tie_break: TieBreak,
) -> Candidates {
    let mut out = Candidates {
        items: [NO_CANDIDATE; 8],
        len: 0,
    };

    for (order, offset) in moves.iter().enumerate() {
        if let Some(square) = from.step(offset, board.size()) {
            if board.is_open(&square) {
                out.items[out.len as usize] = Candidate {
                    degree: degree(square.x as isize, square.y as isize, board, moves),
                    square,
                    order: order as u8,
                };
                out.len += 1;
            }
        }
    }

    let slice = &mut out.items[..out.len as usize];
    match tie_break {
        TieBreak::OffsetOrder => slice.sort_by_key(|c| (c.degree, c.order)),
        TieBreak::Coordinates => slice.sort_by_key(|c| (c.degree, c.square)),
    }

    out
}
