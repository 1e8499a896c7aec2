//! The sweep driver: draws cells, delegates fetching, feeds discoveries back
//! into coverage, and reports progress.
//!
//! The traversal itself performs no I/O; the only blocking point is the
//! fetch collaborator's network call, awaited one cell at a time. The state
//! machine is an explicit, inspectable enum rather than generator suspension.

use std::future::Future;

use storesweep_core::FailurePolicy;
use thiserror::Error;

use crate::cells::{Cell, CellQueue, Draw};

/// One store reported by a query: the payload handed to the sink, plus the
/// coordinate fed into coverage when the payload carried one. A payload
/// missing its geo fields still reaches the sink — only the coverage
/// reporting step is skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Discovered<R> {
    pub point: Option<crate::geo::GeoPoint>,
    pub record: R,
}

/// Everything one cell query produced: the stores to hand onward, plus any
/// further cells the fetch layer wants swept (widening). Widened codes pass
/// through the queue's dedup, so fetchers may report them naively.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<R> {
    pub discoveries: Vec<Discovered<R>>,
    pub widen: Vec<Cell>,
}

impl<R> FetchOutcome<R> {
    /// Outcome with no widening, the common case.
    #[must_use]
    pub fn new(discoveries: Vec<Discovered<R>>) -> Self {
        Self {
            discoveries,
            widen: Vec::new(),
        }
    }
}

/// The fetch collaborator seam.
///
/// Implementations must exhaust their own retry budget before surfacing an
/// error, and must be idempotent: repeated calls for the same cell return
/// equivalent data barring real-world changes.
pub trait CellFetcher {
    type Record;
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_cell(
        &self,
        cell: &Cell,
    ) -> impl Future<Output = Result<FetchOutcome<Self::Record>, Self::Error>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Error)]
pub enum SessionError<E>
where
    E: std::error::Error + 'static,
{
    #[error("cell {code} failed permanently: {source}")]
    CellFailed {
        code: String,
        #[source]
        source: E,
    },
}

/// Totals for a completed (or partially completed) sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub cells_queried: u64,
    pub cells_skipped: u64,
    pub records_yielded: u64,
    /// Cells whose fetch failed permanently under `SkipAndRecord`.
    pub failed_cells: Vec<String>,
}

/// Progress-percentage accounting, decoupled from the correctness-critical
/// remaining count. `peak_remaining` only ever grows; it absorbs widening
/// events so the displayed percentage stays monotone-ish and never exceeds
/// 100.
#[derive(Debug, Default)]
pub struct Progress {
    peak_remaining: usize,
}

impl Progress {
    pub fn observe(&mut self, remaining: usize) {
        if remaining > self.peak_remaining {
            self.peak_remaining = remaining;
        }
    }

    #[must_use]
    pub fn peak_remaining(&self) -> usize {
        self.peak_remaining
    }

    /// `100 - remaining / peak * 100`, rounded to two decimal places.
    /// Observational only; never used for control decisions.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self, remaining: usize) -> f64 {
        if self.peak_remaining == 0 {
            return 100.0;
        }
        let raw = 100.0 - (remaining as f64 / self.peak_remaining as f64 * 100.0);
        (raw * 100.0).round() / 100.0
    }
}

pub struct SearchSession<F> {
    queue: CellQueue,
    fetcher: F,
    policy: FailurePolicy,
    state: SessionState,
    progress: Progress,
}

impl<F: CellFetcher> SearchSession<F> {
    #[must_use]
    pub fn new(queue: CellQueue, fetcher: F, policy: FailurePolicy) -> Self {
        Self {
            queue,
            fetcher,
            policy,
            state: SessionState::Idle,
            progress: Progress::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.remaining()
    }

    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Drives the traversal to completion, handing every fetched record to
    /// `sink`.
    ///
    /// One cell at a time: each query (including the fetch layer's retries)
    /// completes fully before the next draw. Discovered coordinates are
    /// reported back into the queue's coverage index so later cells they
    /// cover are skipped, and any cells the fetch outcome widens with join
    /// the queue before the next draw.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], the first cell whose fetch fails
    /// permanently returns [`SessionError::CellFailed`] and the session ends
    /// in [`SessionState::Failed`]. Under [`FailurePolicy::SkipAndRecord`]
    /// the failure is logged, recorded in the report, and the sweep
    /// continues.
    pub async fn run<S>(&mut self, mut sink: S) -> Result<SessionReport, SessionError<F::Error>>
    where
        S: FnMut(F::Record),
    {
        let mut report = SessionReport::default();
        self.progress.observe(self.queue.remaining());

        loop {
            let cell = match self.queue.next() {
                Draw::Done => break,
                Draw::Cell(cell) => cell,
            };
            if self.state == SessionState::Idle {
                self.state = SessionState::Running;
            }

            tracing::info!(code = %cell.code, "pulling cell");

            match self.fetcher.fetch_cell(&cell).await {
                Ok(outcome) => {
                    let mut found = 0u64;
                    for discovered in outcome.discoveries {
                        if let Some(point) = discovered.point {
                            self.queue.found_location_at(point.lat, point.lng);
                        }
                        sink(discovered.record);
                        found += 1;
                    }
                    self.queue.extend(outcome.widen);
                    report.cells_queried += 1;
                    report.records_yielded += found;

                    // Widening may have grown the queue since the draw.
                    let remaining = self.queue.remaining();
                    self.progress.observe(remaining);
                    let percent = self.progress.percent(remaining);
                    tracing::info!(
                        code = %cell.code,
                        found,
                        total = report.records_yielded,
                        remaining,
                        progress = format_args!("{percent:.2}%"),
                        "cell complete"
                    );
                }
                Err(err) => match self.policy {
                    FailurePolicy::Abort => {
                        self.state = SessionState::Failed;
                        report.cells_skipped = self.queue.skipped();
                        return Err(SessionError::CellFailed {
                            code: cell.code,
                            source: err,
                        });
                    }
                    FailurePolicy::SkipAndRecord => {
                        tracing::warn!(
                            code = %cell.code,
                            error = %err,
                            "cell failed permanently; continuing with partial coverage"
                        );
                        report.failed_cells.push(cell.code);
                    }
                },
            }
        }

        self.state = SessionState::Completed;
        report.cells_skipped = self.queue.skipped();
        Ok(report)
    }
}
