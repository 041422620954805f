pub mod board;
pub mod error;
pub mod event;
pub mod heuristic;
pub mod r#move;
pub mod outcome;
pub mod solver;
pub mod square;
pub mod survey;
pub mod tour;
pub mod worker;

#[cfg(feature = "serde")]
pub mod serde_support;

pub use error::SolveError;
pub use event::Notification;
pub use outcome::Outcome;
pub use solver::{solve, Solver};
pub use square::Square;
pub use tour::Tour;

#[cfg(feature = "python")]
extern crate pyo3;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule(gil_used = false)]
fn knights_tour(m: &Bound<'_, PyModule>) -> PyResult<()> {
    use python_bindings::*;
    m.add_class::<PySolver>()?;
    m.add("STANDARD_SIZE", board::STANDARD_SIZE)?;
    m.add("MAX_BOARD_SIZE", board::MAX_BOARD_SIZE)?;
    Ok(())
}

#[cfg(feature = "python")]
mod python_bindings {
    use super::*;
    use crate::board::Board;
    use crate::heuristic::{self, TieBreak};
    use crate::r#move::MoveTable;
    use crate::survey;

    fn value_error(e: impl std::fmt::Display) -> PyErr {
        PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
    }

    fn parse_tie_break(name: &str) -> PyResult<TieBreak> {
        match name {
            "offset" => Ok(TieBreak::OffsetOrder),
            "coordinates" => Ok(TieBreak::Coordinates),
            other => Err(value_error(format!(
                "unknown tie break {other:?}: expected \"offset\" or \"coordinates\""
            ))),
        }
    }

    #[pyclass(name = "Solver")]
    #[derive(Clone)]
    pub struct PySolver {
        solver: Solver,
    }

    #[pymethods]
    impl PySolver {
        #[new]
        #[pyo3(signature = (board_size, tie_break = "offset"))]
        pub fn new(board_size: usize, tie_break: &str) -> PyResult<Self> {
            let solver =
                Solver::with_options(board_size, MoveTable::knight(), parse_tie_break(tie_break)?)
                    .map_err(value_error)?;
            Ok(PySolver { solver })
        }

        #[staticmethod]
        pub fn standard() -> Self {
            PySolver {
                solver: Solver::standard(),
            }
        }

        pub fn board_size(&self) -> usize {
            self.solver.board_size() as usize
        }

        /// Onward moves from `(x, y)` on an empty board.
        pub fn degree(&self, x: isize, y: isize) -> u8 {
            let board = Board::new(self.solver.board_size());
            heuristic::degree(x, y, &board, self.solver.moves())
        }

        /// Search from `(start_x, start_y)`. `callback`, if given, receives
        /// `("step", index, x, y)` and `("backtrack", x, y)` tuples in order;
        /// an exception raised by it aborts the search. Without a callback the
        /// search runs detached from the interpreter.
        #[pyo3(signature = (start_x, start_y, callback = None))]
        pub fn solve(
            &self,
            py: Python<'_>,
            start_x: usize,
            start_y: usize,
            callback: Option<&Bound<'_, PyAny>>,
        ) -> PyResult<Option<Vec<(usize, usize)>>> {
            let start = self.solver.start(start_x, start_y).map_err(value_error)?;
            let mut search = self.solver.search(start).map_err(value_error)?;

            if let Some(callback) = callback {
                while let Some(event) = search.next_event() {
                    match event {
                        Notification::Step { step_index, square } => {
                            callback.call1(("step", step_index, square.x, square.y))?;
                        }
                        Notification::Backtrack { square } => {
                            callback.call1(("backtrack", square.x, square.y))?;
                        }
                    }
                }
            }

            Ok(py.detach(move || search.into_outcome().into_tour().map(|t| t.coordinates())))
        }

        /// `((x, y), tour or None)` for every start square. Runs detached
        /// from the interpreter, but blocks the calling Python thread until
        /// every start is settled, which on 5x5 or 7x7 boards is effectively
        /// forever.
        pub fn survey(&self, py: Python<'_>) -> Vec<((usize, usize), Option<Vec<(usize, usize)>>)> {
            let solver = self.solver;
            py.detach(move || survey::survey_coordinates(&solver))
        }

        pub fn __repr__(&self) -> String {
            format!(
                "Solver(board_size={}, tie_break={:?})",
                self.solver.board_size(),
                self.solver.tie_break()
            )
        }
    }
}
