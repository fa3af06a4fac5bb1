//! Cosmetic stage progression shown while extraction runs.
//!
//! The progression is decoupled from real backend progress: it advances on a
//! fixed timer, is force-completed when extraction succeeds, and is simply
//! stopped on failure or teardown. `StageBoard` is the pure state machine;
//! `StageSimulator` drives it on the tokio runtime.

use super::{EventSender, WorkflowEvent};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// The fixed, ordered stages of the progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Extract,
    Analyze,
    Finalize,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Fetch, Stage::Extract, Stage::Analyze, Stage::Finalize];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Extract => "extract",
            Stage::Analyze => "analyze",
            Stage::Finalize => "finalize",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Stage::Fetch => "Fetching product page...",
            Stage::Extract => "Extracting product metadata...",
            Stage::Analyze => "Analyzing ingredients and claims...",
            Stage::Finalize => "Finalizing product profile...",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Pending,
    Active,
    Done,
}

/// Pure stage state machine. Invariant: done stages always form a prefix of
/// the sequence, and at most one stage is active, immediately after that
/// prefix.
#[derive(Debug, Clone)]
pub struct StageBoard {
    statuses: [StageStatus; 4],
}

impl StageBoard {
    /// All stages pending; nothing active.
    pub fn new() -> Self {
        Self { statuses: [StageStatus::Pending; 4] }
    }

    /// Marks the first stage active.
    pub fn start(&mut self) {
        if self.statuses.iter().all(|s| *s == StageStatus::Pending) {
            self.statuses[0] = StageStatus::Active;
        }
    }

    /// Marks the active stage done and activates the next one. Returns the
    /// newly active stage, or `None` when the sequence is exhausted (or the
    /// board was never started).
    pub fn advance(&mut self) -> Option<Stage> {
        let active = self.statuses.iter().position(|s| *s == StageStatus::Active)?;
        self.statuses[active] = StageStatus::Done;

        let next = active + 1;
        if next < self.statuses.len() {
            self.statuses[next] = StageStatus::Active;
            Some(Stage::ALL[next])
        } else {
            None
        }
    }

    /// Marks every stage done and nothing active.
    pub fn force_complete(&mut self) {
        self.statuses = [StageStatus::Done; 4];
    }

    pub fn status(&self, stage: Stage) -> StageStatus {
        let index = Stage::ALL.iter().position(|s| *s == stage).unwrap_or(0);
        self.statuses[index]
    }

    /// The currently active stage, if any.
    pub fn active(&self) -> Option<Stage> {
        self.statuses
            .iter()
            .position(|s| *s == StageStatus::Active)
            .map(|index| Stage::ALL[index])
    }

    /// Number of done stages; by the prefix invariant these are always the
    /// first `n` stages.
    pub fn done_count(&self) -> usize {
        self.statuses.iter().filter(|s| **s == StageStatus::Done).count()
    }

    /// True once every stage is done.
    pub fn is_finished(&self) -> bool {
        self.statuses.iter().all(|s| *s == StageStatus::Done)
    }
}

impl Default for StageBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer-driven stage progression.
pub struct StageSimulator {
    interval: Duration,
}

impl StageSimulator {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Activates the first stage immediately and spawns the ticker. Stage
    /// transitions are reported through `events`.
    pub fn start(&self, events: EventSender) -> StageHandle {
        let board = Arc::new(Mutex::new(StageBoard::new()));

        {
            let mut board = board.lock().unwrap();
            board.start();
        }
        let _ = events.send(WorkflowEvent::StageStarted(Stage::Fetch));

        let ticker_board = Arc::clone(&board);
        let ticker_events = events.clone();
        let interval = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately; consume it

            loop {
                ticker.tick().await;

                let (completed, next) = {
                    let mut board = ticker_board.lock().unwrap();
                    if board.is_finished() {
                        // Force-completed from the outside
                        break;
                    }
                    let completed = board.active();
                    let next = board.advance();
                    (completed, next)
                };

                if let Some(stage) = completed {
                    let _ = ticker_events.send(WorkflowEvent::StageCompleted(stage));
                }

                match next {
                    Some(stage) => {
                        let _ = ticker_events.send(WorkflowEvent::StageStarted(stage));
                    }
                    None => break,
                }
            }
        });

        StageHandle { board, task, events }
    }
}

/// Handle to a running stage progression. Dropping the handle stops the
/// timer, so an unwinding workflow never leaks a ticker.
pub struct StageHandle {
    board: Arc<Mutex<StageBoard>>,
    task: JoinHandle<()>,
    events: EventSender,
}

impl StageHandle {
    /// Current board state.
    pub fn snapshot(&self) -> StageBoard {
        self.board.lock().unwrap().clone()
    }

    /// Marks every stage done and stops the timer. Used when extraction
    /// succeeds, wherever the simulated progression currently is.
    pub fn force_complete(&self) {
        self.board.lock().unwrap().force_complete();
        let _ = self.events.send(WorkflowEvent::StagesForceCompleted);
        self.task.abort();
    }

    /// Stops the timer without touching stage state. Safe to call more than
    /// once.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for StageHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
