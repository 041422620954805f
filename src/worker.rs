//! Run a search on its own thread and stream its notifications back.
//!
//! Events arrive on the handle in exactly the order the search emits them,
//! followed by a single [`WorkerMessage::Finished`]. The channel is bounded
//! so a slow consumer (say, an animation) throttles the search instead of
//! buffering the whole trace.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::SolveError;
use crate::event::Notification;
use crate::outcome::Outcome;
use crate::solver::{CancelToken, Solver};
use crate::square::Square;

pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finished {
    pub outcome: Outcome,
    pub elapsed: Duration,
    pub steps: u64,
    pub backtracks: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkerMessage {
    Event(Notification),
    Finished(Finished),
}

pub struct SolveHandle {
    receiver: Receiver<WorkerMessage>,
    cancel: CancelToken,
    thread: Option<JoinHandle<()>>,
}

pub fn spawn(solver: Solver, start: Square) -> Result<SolveHandle, SolveError> {
    spawn_with_capacity(solver, start, DEFAULT_CAPACITY)
}

pub fn spawn_with_capacity(
    solver: Solver,
    start: Square,
    capacity: usize,
) -> Result<SolveHandle, SolveError> {
    let cancel = CancelToken::new();
    let mut search = solver.search_cancellable(start, cancel.clone())?;
    let (sender, receiver) = mpsc::sync_channel(capacity);

    let thread = thread::spawn(move || {
        let started = Instant::now();
        while let Some(event) = search.next_event() {
            if sender.send(WorkerMessage::Event(event)).is_err() {
                log::debug!("receiver for search from {start} dropped, stopping");
                return;
            }
        }

        let steps = search.steps();
        let backtracks = search.backtracks();
        let finished = Finished {
            outcome: search.into_outcome(),
            elapsed: started.elapsed(),
            steps,
            backtracks,
        };
        log::debug!(
            "search from {start}: {} in {} ms",
            finished.outcome,
            finished.elapsed.as_millis()
        );
        // A closed channel here only means nobody is waiting for the result.
        let _ = sender.send(WorkerMessage::Finished(finished));
    });

    Ok(SolveHandle {
        receiver,
        cancel,
        thread: Some(thread),
    })
}

impl SolveHandle {
    /// Ask the worker to stop. It finishes with [`Outcome::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Block for the next message; `None` once the worker has exited.
    pub fn recv(&self) -> Option<WorkerMessage> {
        self.receiver.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<WorkerMessage, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    pub fn try_recv(&self) -> Result<WorkerMessage, TryRecvError> {
        self.receiver.try_recv()
    }

    pub fn iter(&self) -> impl Iterator<Item = WorkerMessage> + '_ {
        self.receiver.iter()
    }

    /// Discard any remaining events and wait for the worker to finish.
    /// `None` if the worker died without reporting.
    pub fn join(mut self) -> Option<Finished> {
        let finished = self.receiver.iter().find_map(|msg| match msg {
            WorkerMessage::Finished(f) => Some(f),
            WorkerMessage::Event(_) => None,
        });
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("search worker panicked");
            }
        }
        finished
    }
}

impl Drop for SolveHandle {
    fn drop(&mut self) {
        // Detached workers see the cancel flag or a closed channel and exit.
        self.cancel.cancel();
    }
}
