//! Backtracking knight's-tour search ordered by Warnsdorff's rule.
//!
//! The search is a depth-first walk: from the current square it tries the
//! reachable unvisited squares in ascending onward-degree order, placing
//! one, descending, and taking it back if the descent fails. The first
//! complete path wins.
//!
//! [`Search`] runs that walk one notification at a time on an explicit
//! frame stack, so callers can pull events at their own pace and board
//! size never limits recursion depth. [`Solver::solve_with`] and [`solve`]
//! drive it to completion with a callback.

use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::board::{Board, MAX_BOARD_SIZE, STANDARD_SIZE};
use crate::error::SolveError;
use crate::event::Notification;
use crate::heuristic::{ordered_candidates, Candidates, TieBreak};
use crate::outcome::Outcome;
use crate::r#move::MoveTable;
use crate::square::Square;
use crate::tour::Tour;

pub(crate) fn check_board_size(board_size: usize) -> Result<u8, SolveError> {
    if (1..=MAX_BOARD_SIZE as usize).contains(&board_size) {
        Ok(board_size as u8)
    } else {
        Err(SolveError::InvalidBoardSize { size: board_size })
    }
}

pub(crate) fn check_start(x: usize, y: usize, size: u8) -> Result<Square, SolveError> {
    if x < size as usize && y < size as usize {
        Ok(Square::new(x as u8, y as u8))
    } else {
        Err(SolveError::InvalidStart {
            x,
            y,
            size: size as usize,
        })
    }
}

/// Shared flag asking a running search to stop.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Search parameters. Holds no board state, so one `Solver` can run any
/// number of independent searches, including concurrently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Solver {
    size: u8,
    moves: MoveTable,
    tie_break: TieBreak,
}

impl Solver {
    pub fn new(board_size: usize) -> Result<Self, SolveError> {
        Self::with_options(board_size, MoveTable::knight(), TieBreak::default())
    }

    pub fn with_options(
        board_size: usize,
        moves: MoveTable,
        tie_break: TieBreak,
    ) -> Result<Self, SolveError> {
        Ok(Solver {
            size: check_board_size(board_size)?,
            moves,
            tie_break,
        })
    }

    pub fn standard() -> Self {
        Solver {
            size: STANDARD_SIZE,
            moves: MoveTable::knight(),
            tie_break: TieBreak::default(),
        }
    }

    pub fn board_size(&self) -> u8 {
        self.size
    }

    pub fn moves(&self) -> &MoveTable {
        &self.moves
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Validate caller coordinates as a start square.
    pub fn start(&self, x: usize, y: usize) -> Result<Square, SolveError> {
        check_start(x, y, self.size)
    }

    /// Every square of the board, in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = Square> {
        let size = self.size;
        (0..size as usize * size as usize).map(move |i| Square::from_index(i, size))
    }

    pub fn search(&self, start: Square) -> Result<Search, SolveError> {
        Search::new(*self, start, None)
    }

    /// Like [`Solver::search`], stopping with [`Outcome::Cancelled`] once
    /// `token` is cancelled.
    pub fn search_cancellable(
        &self,
        start: Square,
        token: CancelToken,
    ) -> Result<Search, SolveError> {
        Search::new(*self, start, Some(token))
    }

    /// Run a search to completion, handing each notification to `on_notify`
    /// as it happens.
    pub fn solve_with<F>(&self, start: Square, mut on_notify: F) -> Result<Outcome, SolveError>
    where
        F: FnMut(Notification),
    {
        let mut search = self.search(start)?;
        while let Some(event) = search.next_event() {
            on_notify(event);
        }
        Ok(search.into_outcome())
    }

    pub fn solve(&self, start: Square) -> Result<Outcome, SolveError> {
        Ok(self.search(start)?.into_outcome())
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::standard()
    }
}

/// Find a tour of a `board_size`×`board_size` board starting at
/// `(start_x, start_y)`, reporting every placement and removal to
/// `on_notify`. Returns `Ok(None)` when no tour exists from that start.
pub fn solve<F>(
    start_x: usize,
    start_y: usize,
    board_size: usize,
    on_notify: F,
) -> Result<Option<Tour>, SolveError>
where
    F: FnMut(Notification),
{
    let solver = Solver::new(board_size)?;
    let start = solver.start(start_x, start_y)?;
    Ok(solver.solve_with(start, on_notify)?.into_tour())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Running,
    Complete,
    Exhausted,
    Cancelled,
}

/// One level of the depth-first walk: the ordered moves out of a square
/// and how many of them have been tried.
#[derive(Clone, Copy, Debug)]
struct Frame {
    candidates: Candidates,
    next: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// About to expand the square at the tip of the path.
    Enter,
    /// About to try the next candidate of the top frame.
    Advance,
}

/// A search in progress. Yields notifications in the order the
/// depth-first walk produces them.
#[derive(Clone, Debug)]
pub struct Search {
    solver: Solver,
    board: Board,
    path: Vec<Square>,
    frames: Vec<Frame>,
    phase: Phase,
    status: Status,
    cancel: Option<CancelToken>,
    steps: u64,
    backtracks: u64,
}

impl Search {
    fn new(solver: Solver, start: Square, cancel: Option<CancelToken>) -> Result<Self, SolveError> {
        let start = solver.start(start.x as usize, start.y as usize)?;

        let mut board = Board::new(solver.size);
        board.mark(&start, 0);
        let mut path = Vec::with_capacity(board.area());
        path.push(start);

        log::debug!(
            "searching {n}x{n} board from {start} ({:?})",
            solver.tie_break,
            n = solver.size
        );

        Ok(Search {
            solver,
            board,
            path,
            frames: Vec::new(),
            phase: Phase::Enter,
            status: Status::Running,
            cancel,
            steps: 0,
            backtracks: 0,
        })
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Squares currently occupied, in visit order.
    pub fn path(&self) -> &[Square] {
        &self.path
    }

    pub fn start(&self) -> Square {
        self.path[0]
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn backtracks(&self) -> u64 {
        self.backtracks
    }

    /// Advance the walk to its next notification. Returns `None` once the
    /// search has reached a terminal status.
    #[hotpath::measure]
    pub fn next_event(&mut self) -> Option<Notification> {
        loop {
            if self.status != Status::Running {
                return None;
            }

            match self.phase {
                Phase::Enter => {
                    if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                        self.finish(Status::Cancelled);
                        return None;
                    }
                    if self.path.len() == self.board.area() {
                        self.finish(Status::Complete);
                        return None;
                    }

                    let from = self.path[self.path.len() - 1];
                    let candidates = ordered_candidates(
                        from,
                        &self.board,
                        &self.solver.moves,
                        self.solver.tie_break,
                    );
                    self.frames.push(Frame {
                        candidates,
                        next: 0,
                    });
                    self.phase = Phase::Advance;
                }
                Phase::Advance => {
                    let Some(frame) = self.frames.last_mut() else {
                        self.finish(Status::Exhausted);
                        return None;
                    };

                    if let Some(candidate) = frame.candidates.get(frame.next as usize).copied() {
                        frame.next += 1;
                        let step_index = self.path.len();
                        self.board.mark(&candidate.square, step_index as u16);
                        self.path.push(candidate.square);
                        self.steps += 1;
                        self.phase = Phase::Enter;
                        return Some(Notification::step(step_index, candidate.square));
                    }

                    // Every move out of the tip failed: the tip itself was a
                    // dead end for the frame below.
                    self.frames.pop();
                    if self.frames.is_empty() {
                        self.finish(Status::Exhausted);
                        return None;
                    }
                    let Some(square) = self.path.pop() else {
                        self.finish(Status::Exhausted);
                        return None;
                    };
                    self.board.unmark(&square);
                    self.backtracks += 1;
                    log::trace!("backtrack from {square} at depth {}", self.path.len());
                    return Some(Notification::backtrack(square));
                }
            }
        }
    }

    fn finish(&mut self, status: Status) {
        self.status = status;
        self.frames.clear();
        log::debug!(
            "search from {} finished: {:?} after {} steps, {} backtracks",
            self.path[0],
            status,
            self.steps,
            self.backtracks
        );
    }

    /// The terminal outcome, or `None` while the search is still running.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.status {
            Status::Running => None,
            Status::Complete => Some(Outcome::Complete(Tour::from_search(
                self.solver.size,
                self.path.clone(),
            ))),
            Status::Exhausted => Some(Outcome::Exhausted),
            Status::Cancelled => Some(Outcome::Cancelled),
        }
    }

    /// Run any remaining work silently and return the terminal outcome.
    pub fn into_outcome(mut self) -> Outcome {
        while self.next_event().is_some() {}
        match self.status {
            Status::Complete => Outcome::Complete(Tour::from_search(self.solver.size, self.path)),
            Status::Cancelled => Outcome::Cancelled,
            Status::Exhausted | Status::Running => Outcome::Exhausted,
        }
    }
}

impl Iterator for Search {
    type Item = Notification;

    fn next(&mut self) -> Option<Notification> {
        self.next_event()
    }
}

impl FusedIterator for Search {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Trace;
    use crate::r#move::KNIGHT_OFFSETS;

    #[rustfmt::skip]
    const TOUR_5X5: [(u8, u8); 25] = [
        (0, 0), (2, 1), (4, 0), (3, 2), (4, 4),
        (2, 3), (0, 4), (1, 2), (3, 3), (1, 4),
        (0, 2), (1, 0), (3, 1), (4, 3), (2, 4),
        (0, 3), (1, 1), (3, 0), (4, 2), (3, 4),
        (1, 3), (0, 1), (2, 2), (4, 1), (2, 0),
    ];

    fn sq(x: u8, y: u8) -> Square {
        Square::new(x, y)
    }

    fn trace_of(solver: &Solver, start: Square) -> (Trace, Outcome) {
        let mut trace = Trace::new();
        let outcome = solver
            .solve_with(start, |e| trace.record(e))
            .expect("valid start");
        (trace, outcome)
    }

    fn assert_is_tour(tour: &Tour, size: usize) {
        assert_eq!(tour.len(), size * size);
        assert!(Tour::from_squares(size, tour.squares().to_vec()).is_ok());
    }

    #[test]
    fn test_single_square_board() {
        let mut events = Vec::new();
        let tour = solve(0, 0, 1, |e| events.push(e))
            .expect("valid input")
            .expect("trivial tour");
        assert_eq!(tour.coordinates(), vec![(0, 0)]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_5x5_from_corner() {
        let (trace, outcome) = trace_of(&Solver::new(5).expect("size"), sq(0, 0));
        let tour = outcome.into_tour().expect("5x5 corner tour");
        let expected: Vec<Square> = TOUR_5X5.iter().map(|&(x, y)| sq(x, y)).collect();
        assert_eq!(tour.squares(), expected.as_slice());
        assert_eq!(trace.steps(), 24);
        assert_eq!(trace.backtracks(), 0);
        assert!(!tour.is_closed());
    }

    #[test]
    fn test_3x3_has_no_tour() {
        let solver = Solver::new(3).expect("size");
        for start in solver.squares() {
            let (trace, outcome) = trace_of(&solver, start);
            assert_eq!(outcome, Outcome::Exhausted, "from {start}");
            assert_eq!(trace.steps(), trace.backtracks());
        }

        let (trace, _) = trace_of(&solver, sq(0, 0));
        assert_eq!(trace.steps(), 14);
    }

    #[test]
    fn test_3x3_center_is_isolated() {
        let mut events = 0;
        let result = solve(1, 1, 3, |_| events += 1).expect("valid input");
        assert_eq!(result, None);
        assert_eq!(events, 0);
    }

    #[test]
    fn test_4x4_exhausts_every_branch() {
        let solver = Solver::new(4).expect("size");
        let mut search = solver.search(sq(0, 0)).expect("start");
        while search.next_event().is_some() {}
        assert_eq!(search.status(), Status::Exhausted);
        assert_eq!(search.steps(), 2222);
        assert_eq!(search.backtracks(), 2222);
        assert_eq!(search.path(), &[sq(0, 0)]);
        assert_eq!(search.board().occupied(), 1);
    }

    #[test]
    fn test_2x2_has_no_moves() {
        assert_eq!(solve(1, 0, 2, |_| {}), Ok(None));
    }

    #[test]
    fn test_8x8_from_corner() {
        let (trace, outcome) = trace_of(&Solver::standard(), sq(0, 0));
        let tour = outcome.into_tour().expect("8x8 tour");
        assert_is_tour(&tour, 8);
        assert_eq!(&tour.squares()[..4], &[sq(0, 0), sq(2, 1), sq(0, 2), sq(1, 0)]);
        assert_eq!(trace.backtracks(), 0);
    }

    #[test]
    fn test_8x8_start_needing_backtracking() {
        let (trace, outcome) = trace_of(&Solver::standard(), sq(2, 4));
        let tour = outcome.into_tour().expect("8x8 tour");
        assert_is_tour(&tour, 8);
        assert_eq!(trace.backtracks(), 46);
        assert_eq!(trace.steps(), 63 + 46);
    }

    #[test]
    fn test_6x6_center_needs_backtracking() {
        let (trace, outcome) = trace_of(&Solver::new(6).expect("size"), sq(3, 3));
        assert_is_tour(outcome.tour().expect("6x6 tour"), 6);
        assert_eq!(trace.backtracks(), 27);
    }

    #[test]
    fn test_5x5_edge_square_needing_backtracking() {
        let (trace, outcome) = trace_of(&Solver::new(5).expect("size"), sq(0, 2));
        assert_is_tour(outcome.tour().expect("5x5 tour"), 5);
        assert_eq!(trace.backtracks(), 1709);
    }

    #[test]
    fn test_replay_reconstructs_result() {
        for (size, start) in [(8, sq(2, 4)), (6, sq(3, 3)), (5, sq(0, 2))] {
            let (trace, outcome) = trace_of(&Solver::new(size).expect("size"), start);
            let tour = outcome.into_tour().expect("tour");
            let replayed = trace.replay(size, start).expect("consistent trace");
            assert_eq!(replayed.as_slice(), tour.squares());
        }
    }

    #[test]
    fn test_replay_of_exhausted_search_returns_to_start() {
        let (trace, _) = trace_of(&Solver::new(4).expect("size"), sq(1, 2));
        assert_eq!(trace.replay(4, sq(1, 2)), Ok(vec![sq(1, 2)]));
    }

    #[test]
    fn test_board_and_path_agree_after_every_event() {
        let solver = Solver::new(4).expect("size");
        let mut search = solver.search(sq(0, 0)).expect("start");
        while let Some(event) = search.next_event() {
            for (i, square) in search.path().iter().enumerate() {
                assert_eq!(search.board().get(square), Some(i as u16));
            }
            assert_eq!(search.board().occupied(), search.path().len());

            if let Notification::Backtrack { square } = event {
                assert_eq!(search.board().get(&square), None);
                assert!(!search.path().contains(&square));
            }
        }
    }

    #[test]
    fn test_step_indices_follow_path_length() {
        let solver = Solver::new(6).expect("size");
        let mut search = solver.search(sq(3, 3)).expect("start");
        while let Some(event) = search.next_event() {
            if let Notification::Step { step_index, square } = event {
                assert_eq!(step_index, search.path().len() - 1);
                assert_eq!(search.path()[step_index], square);
            }
        }
    }

    #[test]
    fn test_iterator_and_callback_agree() {
        let solver = Solver::new(6).expect("size");
        let pulled: Vec<Notification> = solver.search(sq(3, 3)).expect("start").collect();
        let (pushed, _) = trace_of(&solver, sq(3, 3));
        assert_eq!(pulled.as_slice(), pushed.events());
    }

    #[test]
    fn test_outcome_is_none_while_running() {
        let solver = Solver::new(5).expect("size");
        let mut search = solver.search(sq(0, 0)).expect("start");
        assert_eq!(search.outcome(), None);
        assert!(search.next_event().is_some());
        assert_eq!(search.status(), Status::Running);
        assert_eq!(search.outcome(), None);

        let outcome = search.into_outcome();
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_finished_search_stays_finished() {
        let solver = Solver::new(3).expect("size");
        let mut search = solver.search(sq(0, 0)).expect("start");
        while search.next_event().is_some() {}
        assert_eq!(search.next_event(), None);
        assert_eq!(search.next(), None);
        assert_eq!(search.outcome(), Some(Outcome::Exhausted));
    }

    #[test]
    fn test_coordinate_tie_break() {
        let solver =
            Solver::with_options(5, MoveTable::knight(), TieBreak::Coordinates).expect("size");
        let tour = solver.solve(sq(0, 0)).expect("start").into_tour().expect("tour");
        assert_is_tour(&tour, 5);
        assert_eq!(
            &tour.squares()[..8],
            &[sq(0, 0), sq(1, 2), sq(0, 4), sq(2, 3), sq(4, 4), sq(3, 2), sq(4, 0), sq(2, 1)]
        );
    }

    #[test]
    fn test_move_table_order_changes_tour_not_success() {
        let mut reversed = KNIGHT_OFFSETS;
        reversed.reverse();
        let table = MoveTable::from_offsets(reversed).expect("permutation");
        let solver = Solver::with_options(8, table, TieBreak::OffsetOrder).expect("size");
        let tour = solver.solve(sq(0, 0)).expect("start").into_tour().expect("tour");
        assert_is_tour(&tour, 8);
        assert_eq!(tour.squares()[1], sq(1, 2));
    }

    #[test]
    fn test_cancel_before_start() {
        let token = CancelToken::new();
        token.cancel();
        let solver = Solver::new(5).expect("size");
        let mut search = solver.search_cancellable(sq(0, 0), token).expect("start");
        assert_eq!(search.next_event(), None);
        assert_eq!(search.into_outcome(), Outcome::Cancelled);
    }

    #[test]
    fn test_cancel_stops_exhaustive_search() {
        // No tour starts on the minority colour of a 5x5 board, and proving
        // that takes far longer than this test is willing to wait.
        let token = CancelToken::new();
        let solver = Solver::new(5).expect("size");
        let mut search = solver
            .search_cancellable(sq(0, 1), token.clone())
            .expect("start");

        let mut seen = 0;
        while let Some(event) = search.next_event() {
            seen += 1;
            if seen >= 1_000 && !event.is_backtrack() {
                token.cancel();
                break;
            }
        }
        assert_eq!(search.next_event(), None);
        assert_eq!(search.status(), Status::Cancelled);
        assert_eq!(search.into_outcome(), Outcome::Cancelled);
    }

    #[test]
    fn test_invalid_start_is_rejected() {
        let mut events = 0;
        assert_eq!(
            solve(8, 0, 8, |_| events += 1),
            Err(SolveError::InvalidStart { x: 8, y: 0, size: 8 })
        );
        assert_eq!(
            Solver::new(5).expect("size").search(sq(2, 5)).err(),
            Some(SolveError::InvalidStart { x: 2, y: 5, size: 5 })
        );
        assert_eq!(events, 0);
    }

    #[test]
    fn test_invalid_board_size_is_rejected() {
        assert_eq!(
            solve(0, 0, 0, |_| {}),
            Err(SolveError::InvalidBoardSize { size: 0 })
        );
        assert_eq!(
            Solver::new(256),
            Err(SolveError::InvalidBoardSize { size: 256 })
        );
        assert!(Solver::new(255).is_ok());
    }

    #[test]
    fn test_solver_squares_row_major() {
        let solver = Solver::new(3).expect("size");
        let squares: Vec<Square> = solver.squares().collect();
        assert_eq!(squares.len(), 9);
        assert_eq!(squares[1], sq(0, 1));
        assert_eq!(squares[3], sq(1, 0));
    }

    macro_rules! every_start_finds_tour {
        ($($n:literal),*) => {
            $(
                paste::paste! {
                    #[test]
                    fn [<test_every_start_finds_tour_ $n x $n>]() {
                        let solver = Solver::new($n).expect("size");
                        for start in solver.squares() {
                            let tour = solver
                                .solve(start)
                                .expect("start")
                                .into_tour()
                                .unwrap_or_else(|| panic!("no tour from {start}"));
                            assert_eq!(tour.start(), start);
                            assert_is_tour(&tour, $n);
                        }
                    }
                }
            )*
        };
    }

    every_start_finds_tour!(1, 6, 8);

    #[test]
    fn test_random_starts_on_standard_board() {
        use rand::prelude::IndexedRandom;
        use rand::SeedableRng;

        let solver = Solver::standard();
        let squares: Vec<Square> = solver.squares().collect();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        for _ in 0..16 {
            let start = *squares.choose(&mut rng).expect("non-empty board");
            let (trace, outcome) = trace_of(&solver, start);
            let tour = outcome.into_tour().expect("8x8 tour");
            assert_eq!(trace.replay(8, start).expect("trace"), tour.squares());
        }
    }
}
