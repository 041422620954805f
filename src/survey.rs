//! Independent searches from every start square, spread across threads.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::outcome::Outcome;
use crate::solver::{CancelToken, Solver};
use crate::square::Square;
use crate::tour::Tour;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartReport {
    pub start: Square,
    pub outcome: Outcome,
}

impl StartReport {
    pub fn tour(&self) -> Option<&Tour> {
        self.outcome.tour()
    }
}

/// Search from every square of the board, one worker per CPU. Reports are
/// in row-major order of their start squares.
///
/// Boards where some starts admit no tour (5×5 and 7×7 among them) can take
/// a very long time; use [`survey_cancellable`] to bound them.
pub fn survey(solver: &Solver) -> Vec<StartReport> {
    survey_cancellable(solver, &CancelToken::new())
}

/// [`survey`] flattened to `((x, y), tour squares)` pairs.
pub fn survey_coordinates(solver: &Solver) -> Vec<((usize, usize), Option<Vec<(usize, usize)>>)> {
    survey(solver)
        .into_iter()
        .map(|r| {
            (
                (r.start.x as usize, r.start.y as usize),
                r.outcome.into_tour().map(|t| t.coordinates()),
            )
        })
        .collect()
}

pub fn survey_cancellable(solver: &Solver, token: &CancelToken) -> Vec<StartReport> {
    let starts: Vec<Square> = solver.squares().collect();
    let threads = num_cpus::get().clamp(1, starts.len());
    let next = AtomicUsize::new(0);

    log::debug!(
        "surveying {} starts on {} threads",
        starts.len(),
        threads
    );

    let mut reports: Vec<StartReport> = thread::scope(|s| {
        let workers: Vec<_> = (0..threads)
            .map(|_| {
                s.spawn(|| {
                    let mut local = Vec::new();
                    while let Some(&start) = starts.get(next.fetch_add(1, Ordering::Relaxed)) {
                        match solver.search_cancellable(start, token.clone()) {
                            Ok(search) => local.push(StartReport {
                                start,
                                outcome: search.into_outcome(),
                            }),
                            Err(e) => {
                                debug_assert!(false, "board square {start} rejected: {e}");
                                log::warn!("skipping start {start}: {e}");
                            }
                        }
                    }
                    local
                })
            })
            .collect();

        workers
            .into_iter()
            .flat_map(|w| match w.join() {
                Ok(local) => local,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    let size = solver.board_size();
    reports.sort_by_key(|r| r.start.to_index(size));
    reports
}
